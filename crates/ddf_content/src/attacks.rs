//! `<ATTACKS>`: weapon and monster attack definitions.
//!
//! Attacks name things (`SPAWNED_OBJECT`, `PUFF`) that may be defined in a
//! file loaded later, so those names are recorded as pending references and
//! resolved once every domain has been parsed.

use ddf_binding::{FieldTable, FlagDef};
use ddf_foundation::{Diagnostics, Error, ErrorKind, Result, names_match};
use ddf_language::{DdfReader, Field};
use ddf_storage::{DefinitionContainer, Named, PendingRefs};

use crate::damage::{DamageInfo, damage_fields};

/// How an attack is delivered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AttackStyle {
    /// Not set.
    #[default]
    None,
    /// Fires a projectile thing.
    Projectile,
    /// Instant-hit bullet.
    Shot,
    /// Melee swing.
    CloseCombat,
    /// Area damage around the attacker.
    Spray,
    /// Spawns a thing at the target.
    Spawner,
    /// Leaps at the target.
    SkullFly,
}

impl AttackStyle {
    const NAMES: &'static [(&'static str, AttackStyle)] = &[
        ("PROJECTILE", Self::Projectile),
        ("SHOT", Self::Shot),
        ("CLOSECOMBAT", Self::CloseCombat),
        ("SPRAY", Self::Spray),
        ("SPAWNER", Self::Spawner),
        ("SKULLFLY", Self::SkullFly),
    ];

    /// Parses an `ATTACKTYPE` value.
    ///
    /// # Errors
    ///
    /// Returns `BadValue` for an unknown style.
    pub fn parse(text: &str) -> Result<Self> {
        Self::NAMES
            .iter()
            .find(|(name, _)| names_match(name, text.trim()))
            .map(|(_, style)| *style)
            .ok_or_else(|| Error::bad_value("attack type", text.trim()))
    }
}

/// Spawned things face the attacker's direction.
pub const AF_FACE_TARGET: u32 = 1 << 0;
/// Aiming ignores partial invisibility.
pub const AF_NEED_SIGHT: u32 = 1 << 1;
/// The attack can be reflected.
pub const AF_NO_REFLECT: u32 = 1 << 2;
/// Bullet puffs always spawn.
pub const AF_FORCE_PUFF: u32 = 1 << 3;

/// Flags accepted by `ATTACK_SPECIAL`.
pub const ATTACK_FLAGS: &[FlagDef] = &[
    FlagDef::new("FACE_TARGET", AF_FACE_TARGET),
    FlagDef::new("NEED_SIGHT", AF_NEED_SIGHT),
    FlagDef::new("NO_REFLECT", AF_NO_REFLECT),
    FlagDef::negative("REFLECT", AF_NO_REFLECT),
    FlagDef::new("FORCE_PUFF", AF_FORCE_PUFF),
];

/// One `[NAME]` entry of `<ATTACKS>`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttackDefinition {
    /// Entry name.
    pub name: String,
    /// Delivery.
    pub style: AttackStyle,
    /// Damage dealt on hit.
    pub damage: DamageInfo,
    /// Maximum reach.
    pub range: f32,
    /// Height the attack originates from.
    pub height: f32,
    /// Horizontal spread, as a binary angle.
    pub accuracy_angle: u32,
    /// Vertical spread, as a slope.
    pub accuracy_slope: f32,
    /// Name of the projectile or spawned thing.
    pub spawned_object: String,
    /// Resolved index of `spawned_object` in the thing container.
    pub spawned: Option<usize>,
    /// Name of the puff thing.
    pub puff: String,
    /// Resolved index of `puff` in the thing container.
    pub puff_ref: Option<usize>,
    /// `AF_*` bits.
    pub flags: u32,
}

impl AttackDefinition {
    /// Creates a definition with default values.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            range: 2048.0,
            ..Self::default()
        }
    }
}

impl Named for AttackDefinition {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Which name slot of an attack a pending reference fills.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttackSlot {
    /// `SPAWNED_OBJECT`.
    SpawnedObject,
    /// `PUFF`.
    Puff,
}

/// Key for attack references: the attack's index plus the slot.
pub type AttackRefKey = (usize, AttackSlot);

/// Field table for `<ATTACKS>`.
///
/// `ATTACKTYPE`, `SPAWNED_OBJECT` and `PUFF` are handled by the reader.
#[must_use]
pub fn attack_fields() -> FieldTable<AttackDefinition> {
    FieldTable::new()
        .float("RANGE", |a: &mut AttackDefinition| &mut a.range)
        .float("HEIGHT", |a: &mut AttackDefinition| &mut a.height)
        .angle("ACCURACY_ANGLE", |a: &mut AttackDefinition| &mut a.accuracy_angle)
        .slope("ACCURACY_SLOPE", |a: &mut AttackDefinition| &mut a.accuracy_slope)
        .flags("ATTACK_SPECIAL", |a: &mut AttackDefinition| &mut a.flags, ATTACK_FLAGS)
        .sub_table(
            "DAMAGE",
            |a: &mut AttackDefinition| &mut a.damage,
            damage_fields(),
        )
}

/// Writes resolved references back into the attacks.
pub fn apply_attack_refs(
    attacks: &mut DefinitionContainer<AttackDefinition>,
    resolved: Vec<(AttackRefKey, usize)>,
) {
    for ((attack, slot), thing) in resolved {
        let Some(def) = attacks.get_mut(attack) else {
            continue;
        };
        match slot {
            AttackSlot::SpawnedObject => def.spawned = Some(thing),
            AttackSlot::Puff => def.puff_ref = Some(thing),
        }
    }
}

/// Reader for `<ATTACKS>` files.
pub struct AttackReader<'a> {
    attacks: &'a mut DefinitionContainer<AttackDefinition>,
    refs: &'a mut PendingRefs<AttackRefKey>,
    fields: &'a FieldTable<AttackDefinition>,
    current: Option<(AttackDefinition, Option<usize>)>,
}

impl<'a> AttackReader<'a> {
    /// Creates a reader adding to `attacks` and recording thing names in
    /// `refs`.
    pub fn new(
        attacks: &'a mut DefinitionContainer<AttackDefinition>,
        refs: &'a mut PendingRefs<AttackRefKey>,
        fields: &'a FieldTable<AttackDefinition>,
    ) -> Self {
        Self {
            attacks,
            refs,
            fields,
            current: None,
        }
    }
}

impl DdfReader for AttackReader<'_> {
    fn tag(&self) -> &str {
        "ATTACKS"
    }

    fn short_name(&self) -> &str {
        "attacks"
    }

    fn start_entry(&mut self, name: &str, extend: bool, _diag: &mut Diagnostics) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::syntax("entry without a name"));
        }
        let replaces = self.attacks.index_of(name);
        let def = if extend {
            replaces
                .and_then(|index| self.attacks.get(index))
                .cloned()
                .ok_or_else(|| Error::unresolved(name, "attack to extend"))?
        } else {
            AttackDefinition::named(name)
        };
        self.current = Some((def, replaces));
        Ok(())
    }

    fn parse_field(&mut self, field: &Field<'_>, diag: &mut Diagnostics) -> Result<()> {
        let Some((def, _)) = self.current.as_mut() else {
            return Err(Error::new(ErrorKind::Internal(
                "field outside an entry".to_string(),
            )));
        };
        let value = field.value.trim();

        if names_match(field.command, "ATTACKTYPE") {
            def.style = AttackStyle::parse(value)?;
        } else if names_match(field.command, "SPAWNED_OBJECT") {
            def.spawned_object = value.to_string();
            def.spawned = None;
        } else if names_match(field.command, "PUFF") {
            def.puff = value.to_string();
            def.puff_ref = None;
        } else if !self.fields.bind(def, field.command, field.value, diag)? {
            diag.complain(Error::unknown_field(field.command))?;
        }
        Ok(())
    }

    fn finish_entry(&mut self, diag: &mut Diagnostics) -> Result<()> {
        let Some((def, replaces)) = self.current.take() else {
            return Ok(());
        };
        if def.style == AttackStyle::None {
            diag.warn(format!("attack {} has no ATTACKTYPE", def.name));
        }
        if matches!(def.style, AttackStyle::Projectile | AttackStyle::Spawner)
            && def.spawned_object.is_empty()
        {
            return Err(Error::bad_value("spawned object", ""));
        }

        let index = match replaces {
            Some(index) => {
                self.refs.discard(|(attack, _)| *attack == index);
                if let Some(slot) = self.attacks.get_mut(index) {
                    *slot = def;
                }
                index
            }
            None => self.attacks.push(def),
        };

        let context = diag.location().clone();
        if let Some(def) = self.attacks.get(index) {
            if !def.spawned_object.is_empty() {
                self.refs.record(
                    def.spawned_object.clone(),
                    "spawned object",
                    (index, AttackSlot::SpawnedObject),
                    context.clone(),
                );
            }
            if !def.puff.is_empty() {
                self.refs
                    .record(def.puff.clone(), "puff", (index, AttackSlot::Puff), context);
            }
        }
        Ok(())
    }

    fn clear_all(&mut self, _diag: &mut Diagnostics) -> Result<()> {
        log::debug!("#CLEARALL: dropping {} attacks", self.attacks.len());
        self.attacks.clear();
        self.refs.discard(|_| true);
        Ok(())
    }

    fn abort_entry(&mut self) {
        self.current = None;
    }
}
