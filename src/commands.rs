use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported:"
)]
pub enum Command {
    #[command(description = "choose a language and open the menu.")]
    Start,
    #[command(description = "display this text.")]
    Help,
    #[command(description = "open the admin panel (admins only).")]
    Admin,
}
