use super::play::{normalize_name, PlayType, TimeoutRequest};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OffenseScheme {
    #[serde(rename = "spread")]
    Spread,
    #[serde(rename = "pro")]
    Pro,
    #[serde(rename = "flexbone")]
    Flexbone,
    #[serde(rename = "air")]
    Air,
    #[serde(rename = "pistol")]
    Pistol,
}

impl OffenseScheme {
    pub fn from_name(name: &str) -> Option<Self> {
        match normalize_name(name).as_str() {
            "spread" => Some(OffenseScheme::Spread),
            "pro" => Some(OffenseScheme::Pro),
            "flexbone" => Some(OffenseScheme::Flexbone),
            "air" => Some(OffenseScheme::Air),
            "pistol" => Some(OffenseScheme::Pistol),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            OffenseScheme::Spread => "Spread",
            OffenseScheme::Pro => "Pro",
            OffenseScheme::Flexbone => "Flexbone",
            OffenseScheme::Air => "Air",
            OffenseScheme::Pistol => "Pistol",
        }
    }
}

impl fmt::Display for OffenseScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DefenseScheme {
    #[serde(rename = "3-4")]
    ThreeFour,
    #[serde(rename = "4-3")]
    FourThree,
    #[serde(rename = "5-2")]
    FiveTwo,
    #[serde(rename = "4-4")]
    FourFour,
    #[serde(rename = "3-3-5")]
    ThreeThreeFive,
}

impl DefenseScheme {
    pub fn from_name(name: &str) -> Option<Self> {
        match normalize_name(name).as_str() {
            "34" | "threefour" => Some(DefenseScheme::ThreeFour),
            "43" | "fourthree" => Some(DefenseScheme::FourThree),
            "52" | "fivetwo" => Some(DefenseScheme::FiveTwo),
            "44" | "fourfour" => Some(DefenseScheme::FourFour),
            "335" | "threethreefive" => Some(DefenseScheme::ThreeThreeFive),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            DefenseScheme::ThreeFour => "3-4",
            DefenseScheme::FourThree => "4-3",
            DefenseScheme::FiveTwo => "5-2",
            DefenseScheme::FourFour => "4-4",
            DefenseScheme::ThreeThreeFive => "3-3-5",
        }
    }
}

impl fmt::Display for DefenseScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playbook {
    pub offense: OffenseScheme,
    pub defense: DefenseScheme,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub tag: String,
    pub name: String,
    pub playbook: Playbook,
    /// Coaches currently allowed to submit for this team (lowercase usernames)
    pub coaches: Vec<String>,
    /// Coaches who have controlled this team before
    #[serde(default)]
    pub past_coaches: Vec<String>,
    #[serde(default)]
    pub record: Option<String>,
    #[serde(default)]
    pub conference: Option<String>,
    /// Short tag used by renderers for team flair
    #[serde(default)]
    pub display_tag: Option<String>,
}

impl Team {
    pub fn new(tag: impl Into<String>, name: impl Into<String>, playbook: Playbook) -> Self {
        Self {
            tag: tag.into(),
            name: name.into(),
            playbook,
            coaches: Vec::new(),
            past_coaches: Vec::new(),
            record: None,
            conference: None,
            display_tag: None,
        }
    }

    pub fn with_coaches<I, S>(mut self, coaches: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.coaches = coaches.into_iter().map(|c| c.as_ref().trim().to_lowercase()).collect();
        self
    }

    pub fn has_coach(&self, username: &str) -> bool {
        let username = username.to_lowercase();
        self.coaches.iter().any(|c| *c == username)
    }

    /// Admin roster edit. Dropped coaches move to the historical list.
    pub fn update_roster(&mut self, playbook: Playbook, coaches: Vec<String>) {
        let coaches: Vec<String> = coaches.into_iter().map(|c| c.trim().to_lowercase()).collect();
        for previous in self.coaches.drain(..) {
            if !coaches.contains(&previous) && !self.past_coaches.contains(&previous) {
                self.past_coaches.push(previous);
            }
        }
        self.coaches = coaches;
        self.playbook = playbook;
    }
}

/// Per-game scoring and clock-management state of one side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamState {
    pub points: u32,
    /// Points per quarter, grown lazily up to the current quarter
    pub quarters: Vec<u32>,
    pub playclock_penalties: u32,
    pub timeouts: u32,
    pub requested_timeout: TimeoutRequest,
}

impl TeamState {
    pub fn new(timeouts: u32) -> Self {
        Self {
            points: 0,
            quarters: Vec::new(),
            playclock_penalties: 0,
            timeouts,
            requested_timeout: TimeoutRequest::None,
        }
    }

    /// Add points to both the total and the given quarter's tally
    pub fn add_points(&mut self, points: u32, quarter: u32) {
        let index = quarter.max(1) as usize - 1;
        if self.quarters.len() <= index {
            self.quarters.resize(index + 1, 0);
        }
        self.quarters[index] += points;
        self.points += points;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStats {
    pub yards_passing: i32,
    pub yards_rushing: i32,
    pub yards_total: i32,
    pub turnover_interceptions: u32,
    pub turnover_fumble: u32,
    pub field_goals_scored: u32,
    pub field_goals_attempted: u32,
    pub possession_seconds: u32,
}

impl TeamStats {
    /// Credit offensive yardage; total yards always move with the split
    pub fn add_yards(&mut self, play: PlayType, yards: i32) {
        match play {
            PlayType::Run => self.yards_rushing += yards,
            PlayType::Pass => self.yards_passing += yards,
            PlayType::Punt
            | PlayType::FieldGoal
            | PlayType::Kneel
            | PlayType::Spike
            | PlayType::Pat
            | PlayType::TwoPoint
            | PlayType::KickoffNormal
            | PlayType::KickoffSquib
            | PlayType::KickoffOnside => return,
        }
        self.yards_total += yards;
    }

    pub fn add_turnover(&mut self, play: PlayType) {
        match play {
            PlayType::Pass => self.turnover_interceptions += 1,
            _ => self.turnover_fumble += 1,
        }
    }
}
