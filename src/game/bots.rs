/// A named opponent. `effort` is the oracle's iteration budget for its moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BotProfile {
    name: &'static str,
    effort: u32,
}

/// Strongest first.
pub const BOTS: [BotProfile; 5] = [
    BotProfile { name: "veronica", effort: 10_000 },
    BotProfile { name: "anna", effort: 3_000 },
    BotProfile { name: "jan", effort: 800 },
    BotProfile { name: "arnie", effort: 200 },
    BotProfile { name: "puffy", effort: 50 },
];

pub const DEFAULT_BOT: &str = "arnie";

impl BotProfile {
    /// Look a bot up by name, ignoring case.
    pub fn by_name(name: &str) -> Option<BotProfile> {
        BOTS.iter()
            .copied()
            .find(|bot| bot.name.eq_ignore_ascii_case(name))
    }

    pub fn all() -> &'static [BotProfile] {
        &BOTS
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Capitalized name, as shown in result messages.
    pub fn display_name(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    pub fn icon(&self) -> String {
        format!("player_{}.png", self.name)
    }

    pub fn effort(&self) -> u32 {
        self.effort
    }

    /// The bot after this one in the catalogue, wrapping around.
    pub fn next(&self) -> BotProfile {
        let idx = BOTS.iter().position(|bot| bot == self).unwrap_or(0);
        BOTS[(idx + 1) % BOTS.len()]
    }
}

impl Default for BotProfile {
    fn default() -> Self {
        // DEFAULT_BOT is in the catalogue
        BotProfile::by_name(DEFAULT_BOT).unwrap_or(BOTS[BOTS.len() - 1])
    }
}
