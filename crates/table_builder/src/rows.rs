//! Pipe-delimited table rows → validated core tables
//!
//! Three row shapes, one per file:
//! - outcomes: `play|offense|defense|position range|difference range|result|yards`
//! - times:    `play|result|yards|seconds`
//! - teams:    `tag|name|offense|defense|coaches[,...]|conference|display tag`
//!
//! Blank fields mean "absent". Lines starting with `#` are comments.

use anyhow::{anyhow, bail, Context, Result};
use gridiron_core::models::{DefenseScheme, OffenseScheme, PlayResult, PlayType, Playbook, Team};
use gridiron_core::table::{BucketRange, Outcome, OutcomeTable, TimeTable};
use rustc_hash::FxHashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Row counts from one load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub total_rows: u32,
    pub parsed: u32,
    pub skipped: u32,
}

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'|')
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("Failed to open table file: {}", path.display()))
}

fn field<'r>(record: &'r csv::StringRecord, index: usize) -> Option<&'r str> {
    record.get(index).filter(|value| !value.is_empty())
}

fn required<'r>(record: &'r csv::StringRecord, index: usize, name: &str) -> Result<&'r str> {
    field(record, index).ok_or_else(|| anyhow!("missing {name}"))
}

fn play_type(name: &str) -> Result<PlayType> {
    PlayType::from_table_name(name).ok_or_else(|| anyhow!("unknown play '{name}'"))
}

fn play_result(name: &str) -> Result<PlayResult> {
    PlayResult::from_table_name(name).ok_or_else(|| anyhow!("unknown result '{name}'"))
}

fn offense_scheme(name: &str) -> Result<OffenseScheme> {
    OffenseScheme::from_name(name).ok_or_else(|| anyhow!("unknown offense '{name}'"))
}

fn defense_scheme(name: &str) -> Result<DefenseScheme> {
    DefenseScheme::from_name(name).ok_or_else(|| anyhow!("unknown defense '{name}'"))
}

fn yards(value: Option<&str>) -> Result<Option<i32>> {
    value
        .map(|v| v.parse::<i32>().with_context(|| format!("invalid yards '{v}'")))
        .transpose()
}

fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

/// Load an outcome table, validating bucket contiguity for every sub-table
pub fn read_outcome_table<R: Read>(input: R) -> Result<(OutcomeTable, ParseStats)> {
    let mut builder = OutcomeTable::builder();
    let mut stats = ParseStats::default();

    for record in reader(input).records() {
        let record = record.context("Failed to read outcome row")?;
        stats.total_rows += 1;
        let line = line_of(&record);

        let parsed: Result<()> = (|| {
            let play = play_type(required(&record, 0, "play")?)?;
            let offense = field(&record, 1).map(offense_scheme).transpose()?;
            let defense = field(&record, 2).map(defense_scheme).transpose()?;
            let position: BucketRange = required(&record, 3, "position range")?.parse()?;
            let difference: BucketRange = required(&record, 4, "difference range")?.parse()?;
            let result = play_result(required(&record, 5, "result")?)?;
            let yards = yards(field(&record, 6))?;
            builder.insert(play, offense, defense, position, difference, Outcome::new(result, yards))?;
            Ok(())
        })();
        parsed.with_context(|| format!("Outcome row at line {line}: {:?}", record.as_slice()))?;
        stats.parsed += 1;
    }

    let table = builder.build().context("Outcome table failed validation")?;
    log::info!("Loaded {} outcome rows into {} tables", stats.parsed, table.table_count());
    Ok((table, stats))
}

pub fn load_outcome_table(path: &Path) -> Result<(OutcomeTable, ParseStats)> {
    read_outcome_table(open(path)?).with_context(|| format!("In {}", path.display()))
}

pub fn read_time_table<R: Read>(input: R) -> Result<(TimeTable, ParseStats)> {
    let mut table = TimeTable::new();
    let mut stats = ParseStats::default();

    for record in reader(input).records() {
        let record = record.context("Failed to read time row")?;
        stats.total_rows += 1;
        let line = line_of(&record);

        let parsed: Result<()> = (|| {
            let play = play_type(required(&record, 0, "play")?)?;
            let result = play_result(required(&record, 1, "result")?)?;
            let yards = yards(field(&record, 2))?;
            let seconds_text = required(&record, 3, "seconds")?;
            let seconds: u32 =
                seconds_text.parse().with_context(|| format!("invalid seconds '{seconds_text}'"))?;
            table.insert(play, result, yards, seconds)?;
            Ok(())
        })();
        parsed.with_context(|| format!("Time row at line {line}: {:?}", record.as_slice()))?;
        stats.parsed += 1;
    }

    if table.is_empty() {
        bail!("Time table has no rows");
    }
    log::info!("Loaded {} time rows", stats.parsed);
    Ok((table, stats))
}

pub fn load_time_table(path: &Path) -> Result<(TimeTable, ParseStats)> {
    read_time_table(open(path)?).with_context(|| format!("In {}", path.display()))
}

/// Teams by tag, plus which team each coach controls
#[derive(Debug, Clone, Default)]
pub struct TeamIndex {
    teams: FxHashMap<String, Team>,
    coaches: FxHashMap<String, String>,
}

impl TeamIndex {
    pub fn insert(&mut self, team: Team) {
        let tag = team.tag.to_lowercase();
        for coach in &team.coaches {
            self.coaches.insert(coach.clone(), tag.clone());
        }
        self.teams.insert(tag, team);
    }

    pub fn by_tag(&self, tag: &str) -> Option<&Team> {
        self.teams.get(&tag.to_lowercase())
    }

    pub fn by_coach(&self, coach: &str) -> Option<&Team> {
        let tag = self.coaches.get(&coach.to_lowercase())?;
        self.teams.get(tag)
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Teams sorted by tag
    pub fn teams(&self) -> Vec<&Team> {
        let mut teams: Vec<&Team> = self.teams.values().collect();
        teams.sort_by(|a, b| a.tag.cmp(&b.tag));
        teams
    }
}

/// Load the team list. Malformed rows are skipped with a warning.
pub fn read_teams<R: Read>(input: R) -> Result<(TeamIndex, ParseStats)> {
    let mut index = TeamIndex::default();
    let mut stats = ParseStats::default();

    for record in reader(input).records() {
        let record = record.context("Failed to read team row")?;
        stats.total_rows += 1;

        let parsed: Result<Team> = (|| {
            if record.len() < 5 {
                bail!("expected at least 5 fields, found {}", record.len());
            }
            let playbook = Playbook {
                offense: offense_scheme(required(&record, 2, "offense")?)?,
                defense: defense_scheme(required(&record, 3, "defense")?)?,
            };
            let mut team = Team::new(
                required(&record, 0, "tag")?.to_lowercase(),
                required(&record, 1, "name")?,
                playbook,
            )
            .with_coaches(record[4].split(',').filter(|c| !c.trim().is_empty()));
            team.conference = field(&record, 5).map(str::to_string);
            team.display_tag = field(&record, 6).map(str::to_string);
            Ok(team)
        })();

        match parsed {
            Ok(team) => {
                index.insert(team);
                stats.parsed += 1;
            }
            Err(e) => {
                log::warn!("Could not parse team line {}: {:#}", line_of(&record), e);
                stats.skipped += 1;
            }
        }
    }

    log::info!("Loaded {} teams ({} skipped)", stats.parsed, stats.skipped);
    Ok((index, stats))
}

pub fn load_teams(path: &Path) -> Result<(TeamIndex, ParseStats)> {
    read_teams(open(path)?).with_context(|| format!("In {}", path.display()))
}
