//! User-facing message texts.
//!
//! Every validation failure category keeps its own corrective message, so
//! a user can tell a malformed date from an impossible or past one.

pub const COMMANDS_HINT: &str = "Введите:\n\
    /lowprice - для поиска вариантов подешевле\n\
    /highprice - для поиска вариантов подороже\n\
    /bestdeal - для выбора по удаленности от центра города\n\
    /history - для показа истории поиска";

pub fn greeting(name: &str) -> String {
    format!(
        "Привет, {}!\n\
         Я - бот агентства Too Easy Travel, который поможет тебе в поиске отелей и хостелов.\n\
         {}",
        name, COMMANDS_HINT
    )
}

// Survey prompts
pub const ASK_CITY_LOWPRICE: &str = "Экономика должна быть экономной. Какой город рассматриваем?";
pub const ASK_CITY_HIGHPRICE: &str = "Гулять так гулять! Какой город рассматриваем?";
pub const ASK_CITY: &str = "Какой город рассматриваем?";
pub const ASK_DISTANCE_MIN: &str =
    "Какое минимальное расстояние от центра подходит? (целое число)";
pub const ASK_DISTANCE_MAX: &str =
    "Какое максимальное расстояние от центра рассматриваем? (целое число)";
pub const CHOOSE_CITY: &str = "Выберите подходящий город, либо измените ввод:";
pub const ASK_CHECK_IN: &str = "Укажите дату заезда (ДД.ММ.ГГГГ)";
pub const ASK_CHECK_OUT: &str = "Укажите дату выезда (ДД.ММ.ГГГГ)";
pub const ASK_HOTEL_COUNT: &str = "Сколько предложений показать? (цифра до 5)";
pub const ASK_PHOTO_CHOICE: &str = "Загрузить фото? (да/нет)";
pub const ASK_PHOTO_COUNT: &str = "Сколько фото показать? (цифра до 5)";

// Corrective messages, one per failure category
pub const DATE_FORMAT_INVALID: &str =
    "Ну как так? Дата введена неверно, попробуйте снова (ДД.ММ.ГГГГ)";
pub const DATE_IMPOSSIBLE: &str = "Такой даты не существует, проверьте ввод (ДД.ММ.ГГГГ)";
pub const CHECK_IN_NOT_FUTURE: &str = "Упс, дата заселения должна быть больше текущей.";
pub const CHECK_OUT_NOT_AFTER: &str = "Упс, дата выезда должна быть больше даты заселения.";
pub const COUNT_INVALID: &str = "Такого от вас я не ожидал... Укажите число до 5.";
pub const YES_NO_INVALID: &str = "Что-что??? Напишите да/нет.";
pub const DISTANCE_INVALID: &str = "Нужно целое число, попробуйте снова.";
pub const DISTANCE_ORDER_INVALID: &str =
    "Максимальное расстояние должно быть больше минимального.";
pub const CITY_NOT_FOUND: &str = "Такого города нет. Проверьте ввод или задайте другой город";
pub const CITY_SERVER_ERROR: &str = "Ошибка ответа сервера, пожалуйста повторите ввод.";
pub const CITY_CHOICE_HINT: &str = "Выберите город кнопкой выше, либо задайте новый поиск.";

// Search reporting
pub const COLLECTING: &str = "Собираю данные...";
pub const NOTHING_FOUND: &str = "Ничего не нашлось...";
pub const SEARCH_FAILED: &str = "Поиск не удался, попробуйте позже.";

// History
pub const NO_HISTORY: &str = "В истории нет записей.";
pub const HISTORY_DELETE_HINT: &str = "Для очистки истории используйте команду /delete";
pub const HISTORY_CLEARED: &str = "История очищена!";
pub const GENERIC_FAILURE: &str = "Что-то пошло не так...";
