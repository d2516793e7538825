use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Поддерживаемые команды:")]
pub enum Command {
    #[command(description = "приветствие и справка")]
    Start,
    #[command(description = "показать справку")]
    Help,
    #[command(description = "поиск вариантов подешевле")]
    LowPrice,
    #[command(description = "поиск вариантов подороже")]
    HighPrice,
    #[command(description = "выбор по удаленности от центра города")]
    BestDeal,
    #[command(description = "показать историю поиска")]
    History,
    #[command(description = "очистить историю поиска")]
    Delete,
}
