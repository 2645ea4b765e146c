use tdlib::enums::TextEntityType;
use tdlib::types::FormattedText;

#[derive(Debug, PartialEq, Eq)]
pub struct ParsedCommand {
    pub name: String,
    pub bot_username: Option<String>,
    pub arguments: String,
}

impl ParsedCommand {
    pub fn parse(formatted_text: &FormattedText) -> Option<Self> {
        let entity = formatted_text
            .entities
            .iter()
            .find(|e| e.r#type == TextEntityType::BotCommand && e.offset == 0)?;

        let end = usize::try_from(entity.length).ok()?;
        let command = formatted_text.text.get(1..end)?;

        let (command_name, username) =
            command.split_once('@').map_or((command, None), |parts| (parts.0, Some(parts.1)));

        let arguments = formatted_text.text.get(end..)?.trim_ascii_start().into();

        Some(Self {
            name: command_name.to_lowercase(),
            bot_username: username.map(str::to_string),
            arguments,
        })
    }

    /// Commands naming a bot are only accepted once our own username is known.
    pub fn is_addressed_to(&self, my_username: Option<&str>) -> bool {
        self.bot_username.as_deref().is_none_or(|bot_username| {
            my_username.is_some_and(|me| bot_username.eq_ignore_ascii_case(me))
        })
    }
}
