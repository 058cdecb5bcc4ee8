//! Observation enrichment: species grouping, count filling, site-function
//! assignment and address attribution.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::geocode::{self, GeocodeCache, ReverseGeocoder};
use crate::localtime;
use veldwerk_parser::ObservationRow;

/// High-level species group used for output partitioning. Labels are the
/// survey platform's Dutch terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SpeciesGroup {
    Bats,
    Birds,
    Other,
    Unknown,
}

impl SpeciesGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeciesGroup::Bats => "Vleermuizen",
            SpeciesGroup::Birds => "Vogels",
            SpeciesGroup::Other => "Overig",
            SpeciesGroup::Unknown => "onbekend",
        }
    }
}

impl fmt::Display for SpeciesGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static BAT_SPECIES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"vleermuis|vlieger").expect("bat species pattern"));
static GROUND_SPECIES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bmuis\b|vos|pad|salamander").expect("ground species pattern"));

/// Classify a species name. Everything that is not a bat, a known ground
/// species or blank counts as a bird; the exports are bird-heavy.
pub fn species_group(species: Option<&str>) -> SpeciesGroup {
    let lowered = species.unwrap_or("").to_lowercase();
    if BAT_SPECIES.is_match(&lowered) {
        return SpeciesGroup::Bats;
    }
    if GROUND_SPECIES.is_match(&lowered) {
        return SpeciesGroup::Other;
    }
    if lowered.is_empty() {
        return SpeciesGroup::Unknown;
    }
    SpeciesGroup::Birds
}

/// Ecological function of the observed location, derived from group,
/// behaviour and count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SiteFunction {
    SummerRoost,
    MaternityRoost,
    MatingRoost,
    NestSite,
    FlightPath,
    ForagingArea,
}

impl SiteFunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteFunction::SummerRoost => "zomerverblijfplaats",
            SiteFunction::MaternityRoost => "kraamverblijfplaats",
            SiteFunction::MatingRoost => "paarverblijfplaats",
            SiteFunction::NestSite => "nestlocatie",
            SiteFunction::FlightPath => "vliegroute",
            SiteFunction::ForagingArea => "foerageergebied",
        }
    }
}

impl fmt::Display for SiteFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const BAT_ROOST_BEHAVIOURS: &[&str] = &[
    "Invliegend (algemeen)",
    "uitvliegend (algemeen)",
    "territoriumindicerend",
    "ter plaatse",
    "bezoek aan nestplaats",
];

const BAT_MATING_BEHAVIOURS: &[&str] = &[
    "baltsend",
    "zwermend (algemeen)",
    "baltsend/zingend",
    "parend / copula",
];

const BIRD_NEST_BEHAVIOURS: &[&str] = &[
    "Invliegend (algemeen)",
    "uitvliegend (algemeen)",
    "territoriumindicerend",
    "ter plaatse",
    "bezoek aan nestplaats",
    "parend / copula",
    "baltsend/zingend",
    "baltsend",
    "slaapplaats",
    "nest-indicerend gedrag",
    "roepend",
    "nestbouw",
    "rustend",
];

const FLIGHT_PATH_BEHAVIOURS: &[&str] = &[
    "overvliegend",
    "passerend (niet nader omschreven)",
    "overvliegend naar noord",
    "overvliegend naar zuid",
    "overvliegend naar oost",
    "overvliegend naar west",
];

const FORAGING_BEHAVIOURS: &[&str] = &["foeragerend"];

/// Behaviours that indicate a fixed location worth an address lookup.
pub const ROOST_BEHAVIOURS: &[&str] = &[
    "Invliegend (algemeen)",
    "baltsend",
    "zwermend (algemeen)",
    "uitvliegend (algemeen)",
    "nest-indicerend gedrag",
    "territoriumindicerend",
    "ter plaatse",
    "slaapplaats",
    "bezoek aan nestplaats",
    "baltsend/zingend",
    "rustend",
    "nestbouw",
    "parend / copula",
];

fn behaviour_in(set: &[&str], behaviour: &str) -> bool {
    set.contains(&behaviour)
}

/// Derive the site function. Passes run in a fixed order and later passes
/// override earlier ones (a foraging bat at a roost counts as foraging).
/// Rows without a numeric count get no function.
pub fn site_function(
    group: SpeciesGroup,
    behaviour: Option<&str>,
    count: Option<f64>,
) -> Option<SiteFunction> {
    let behaviour = behaviour?;
    let count = count?;

    let mut function = None;
    if group == SpeciesGroup::Bats && behaviour_in(BAT_ROOST_BEHAVIOURS, behaviour) {
        if count < 10.0 {
            function = Some(SiteFunction::SummerRoost);
        }
        if count > 9.0 {
            function = Some(SiteFunction::MaternityRoost);
        }
    }
    if group == SpeciesGroup::Bats && behaviour_in(BAT_MATING_BEHAVIOURS, behaviour) {
        function = Some(SiteFunction::MatingRoost);
    }
    if group == SpeciesGroup::Birds && behaviour_in(BIRD_NEST_BEHAVIOURS, behaviour) {
        function = Some(SiteFunction::NestSite);
    }
    if behaviour_in(FLIGHT_PATH_BEHAVIOURS, behaviour) {
        function = Some(SiteFunction::FlightPath);
    }
    if behaviour_in(FORAGING_BEHAVIOURS, behaviour) {
        function = Some(SiteFunction::ForagingArea);
    }
    function
}

/// Missing counts mean one animal; an unparseable count stays unknown.
pub fn parse_count(raw: Option<&str>) -> Option<f64> {
    match raw {
        None => Some(1.0),
        Some(value) => value.trim().parse().ok(),
    }
}

/// File-name safe version of a project or group label.
pub fn safe_name(raw: &str) -> String {
    static NON_ALNUM: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"[^A-Za-z0-9]+").expect("non-alnum pattern"));

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "unknown".to_string();
    }
    let replaced = NON_ALNUM.replace_all(trimmed, "_");
    replaced.to_lowercase().chars().take(40).collect()
}

/// One observation after enrichment. The raw export row stays embedded;
/// derived fields sit alongside it.
#[derive(Debug, Clone)]
pub struct Observation {
    pub raw: ObservationRow,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub group: SpeciesGroup,
    pub count: Option<f64>,
    pub function: Option<SiteFunction>,
    pub project_name: Option<String>,
    pub location_remark: Option<String>,
    pub address: Option<String>,
    pub street: Option<String>,
    pub place: Option<String>,
    pub roost_number: Option<usize>,
}

impl Observation {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let latitude = self.raw.latitude.as_deref()?.trim().parse().ok()?;
        let longitude = self.raw.longitude.as_deref()?.trim().parse().ok()?;
        Some((latitude, longitude))
    }
}

/// Synchronous enrichment pass: everything derivable from the row itself
/// plus the project-name lookup. Addresses come later via
/// [`attach_addresses`].
pub fn enrich(
    rows: &[ObservationRow],
    project_names: &HashMap<String, String>,
) -> Vec<Observation> {
    rows.iter()
        .map(|row| {
            let seen = row
                .seen_at
                .as_deref()
                .and_then(|raw| localtime::parse_naive(raw.trim()));
            let group = species_group(row.species.as_deref());
            let count = parse_count(row.count.as_deref());
            let function = site_function(group, row.behaviour.as_deref(), count);
            let project_name = row
                .project_id
                .as_deref()
                .and_then(|id| project_names.get(id))
                .cloned();

            Observation {
                date: seen.map(|dt| dt.date()),
                time: seen.map(|dt| dt.time()),
                group,
                count,
                function,
                project_name,
                location_remark: row.remark.clone(),
                address: None,
                street: None,
                place: None,
                roost_number: None,
                raw: row.clone(),
            }
        })
        .collect()
}

/// Reverse geocode the observations whose behaviour marks a fixed
/// location, filling address, street and place. Rows without coordinates
/// or with other behaviours are left untouched.
pub async fn attach_addresses(
    observations: &mut [Observation],
    geocoder: &dyn ReverseGeocoder,
    cache: &mut GeocodeCache,
    behaviours: &[&str],
) {
    for observation in observations.iter_mut() {
        let Some((latitude, longitude)) = observation.coordinates() else {
            continue;
        };
        let eligible = observation
            .raw
            .behaviour
            .as_deref()
            .is_some_and(|b| behaviours.contains(&b));
        if !eligible {
            continue;
        }

        let address = geocode::resolve(geocoder, cache, latitude, longitude).await;
        let (street, place) = geocode::parse_address(address.as_deref());
        observation.address = address;
        observation.street = street;
        observation.place = place;
    }
    debug!(cached = cache.len(), "address attribution finished");
}

/// Number the distinct addresses 1..n in lexicographic order and stamp
/// each observation with its address's number. Address-less rows get
/// none.
pub fn assign_roost_numbers(observations: &mut [Observation]) {
    let distinct: BTreeSet<String> = observations
        .iter()
        .filter_map(|obs| obs.address.clone())
        .collect();
    let numbers: HashMap<String, usize> = distinct
        .into_iter()
        .enumerate()
        .map(|(index, address)| (address, index + 1))
        .collect();

    for observation in observations.iter_mut() {
        observation.roost_number = observation
            .address
            .as_deref()
            .and_then(|address| numbers.get(address))
            .copied();
    }
}

/// Project id to project name lookup from the field-visit export (the
/// observations export only carries the id).
pub fn project_name_map(visits: &[veldwerk_parser::FieldVisitRow]) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for visit in visits {
        if let (Some(id), Some(name)) = (&visit.project_id, &visit.project_name) {
            map.entry(id.clone()).or_insert_with(|| name.clone());
        }
    }
    map
}
