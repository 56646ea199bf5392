//! The `DAMAGE.*` sub-record shared by things and attacks.

use ddf_binding::FieldTable;

/// How much damage something does, and how.
#[derive(Clone, Debug, PartialEq)]
pub struct DamageInfo {
    /// Base damage.
    pub nominal: f32,
    /// Upper bound for random damage; negative means "same as nominal".
    pub linger_max: f32,
    /// Tics between repeated hits.
    pub delay: i32,
    /// Ignores armour.
    pub bypass_all: bool,
    /// Chance of printing an obituary when this damage kills, `0..=1`.
    pub obituary_chance: f32,
}

impl Default for DamageInfo {
    fn default() -> Self {
        Self {
            nominal: 0.0,
            linger_max: -1.0,
            delay: 0,
            bypass_all: false,
            obituary_chance: 1.0,
        }
    }
}

/// Field table for `DAMAGE.*`.
#[must_use]
pub fn damage_fields() -> FieldTable<DamageInfo> {
    FieldTable::new()
        .float("VAL", |d: &mut DamageInfo| &mut d.nominal)
        .float("MAX", |d: &mut DamageInfo| &mut d.linger_max)
        .time("DELAY", |d: &mut DamageInfo| &mut d.delay)
        .boolean("BYPASS_ALL", |d: &mut DamageInfo| &mut d.bypass_all)
        .percent("OBITUARY_CHANCE", |d: &mut DamageInfo| &mut d.obituary_chance)
}
