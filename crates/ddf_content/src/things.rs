//! `<THINGS>`: creature and object definitions.

use ddf_binding::{FieldTable, FlagDef, parse_numeric};
use ddf_foundation::{Diagnostics, Error, ErrorKind, Result, names_match};
use ddf_language::{DdfReader, Field};
use ddf_states::{
    ActionCode, ActionTable, ArgKind, StateArena, StateEngine, StateGroup, StateIndex,
    lookup_label,
};
use ddf_storage::{DefinitionContainer, Named};

use crate::damage::{DamageInfo, damage_fields};

/// Takes damage and can be killed.
pub const MF_SHOOTABLE: u32 = 1 << 0;
/// Blocks movement.
pub const MF_SOLID: u32 = 1 << 1;
/// Not affected by gravity.
pub const MF_NOGRAVITY: u32 = 1 << 2;
/// Counts toward the kill percentage.
pub const MF_COUNTKILL: u32 = 1 << 3;
/// Can move up and down freely.
pub const MF_FLOAT: u32 = 1 << 4;
/// Is a projectile.
pub const MF_MISSILE: u32 = 1 << 5;
/// Not linked into the blockmap.
pub const MF_NOBLOCKMAP: u32 = 1 << 6;
/// Can walk off ledges.
pub const MF_DROPOFF: u32 = 1 << 7;
/// Passes through walls.
pub const MF_NOCLIP: u32 = 1 << 8;
/// Drawn partially invisible.
pub const MF_FUZZY: u32 = 1 << 9;

/// Special flags accepted by `SPECIAL`.
pub const THING_FLAGS: &[FlagDef] = &[
    FlagDef::new("SHOOTABLE", MF_SHOOTABLE),
    FlagDef::new("SOLID", MF_SOLID),
    FlagDef::new("NOGRAVITY", MF_NOGRAVITY),
    FlagDef::negative("GRAVITY", MF_NOGRAVITY),
    FlagDef::new("COUNT_AS_KILL", MF_COUNTKILL),
    FlagDef::new("FLOAT", MF_FLOAT),
    FlagDef::new("MISSILE", MF_MISSILE),
    FlagDef::new("NOBLOCKMAP", MF_NOBLOCKMAP),
    FlagDef::negative("BLOCKMAP", MF_NOBLOCKMAP),
    FlagDef::new("DROPOFF", MF_DROPOFF),
    FlagDef::new("NOCLIP", MF_NOCLIP),
    FlagDef::new("FUZZY", MF_FUZZY),
];

/// Actions thing states may name.
pub const THING_ACTIONS: ActionTable = ActionTable::new(&[
    ActionCode::new("NOTHING", ArgKind::None),
    ActionCode::new("LOOK", ArgKind::None),
    ActionCode::new("CHASE", ArgKind::None),
    ActionCode::new("FACE_TARGET", ArgKind::None),
    ActionCode::new("MAKESOUND", ArgKind::String),
    ActionCode::new("PLAYSOUND", ArgKind::String),
    ActionCode::new("RANGE_ATTACK", ArgKind::String),
    ActionCode::new("CLOSE_ATTACK", ArgKind::String),
    ActionCode::new("JUMP", ArgKind::Jump),
    ActionCode::new("TRANS_SET", ArgKind::Percent),
    ActionCode::new("TRANS_FADE", ArgKind::Percent),
    ActionCode::new("SET_SKIN", ArgKind::Numeric),
    ActionCode::new("GRAVITY", ArgKind::Float),
    ActionCode::new("MAKEDEAD", ArgKind::None),
    ActionCode::new("EXPLODE", ArgKind::None),
]);

/// One `[NAME:NUMBER]` entry of `<THINGS>`.
#[derive(Clone, Debug, PartialEq)]
pub struct ThingDefinition {
    /// Entry name.
    pub name: String,
    /// Editor / DEHACKED number, -1 if none.
    pub number: i32,
    /// Starting health.
    pub spawn_health: f32,
    /// Movement speed.
    pub speed: f32,
    /// Multiplier applied in fast mode.
    pub fast: f32,
    /// Collision radius.
    pub radius: f32,
    /// Collision height.
    pub height: f32,
    /// Mass for thrust calculations.
    pub mass: f32,
    /// Tics before the first attack.
    pub reaction_time: i32,
    /// Opacity, `0..=1`.
    pub translucency: f32,
    /// `MF_*` bits.
    pub flags: u32,
    /// Tics until a projectile explodes by itself, 0 for never.
    pub fuse: i32,
    /// Team bits (`SIDE = AB`).
    pub side: u32,
    /// Colourmap lump used to recolour the sprite.
    pub palette_remap: String,
    /// Contact damage.
    pub damage: DamageInfo,
    /// Labelled state ranges.
    pub states: StateGroup,
    /// First `SPAWN` state.
    pub spawn_state: StateIndex,
    /// First `IDLE` state (falls back to `SPAWN`).
    pub idle_state: StateIndex,
    /// First `DEATH` state, if any.
    pub death_state: StateIndex,
}

impl ThingDefinition {
    /// Creates a definition with default values.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number: -1,
            spawn_health: 1000.0,
            speed: 0.0,
            fast: 1.0,
            radius: 20.0,
            height: 16.0,
            mass: 100.0,
            reaction_time: 0,
            translucency: 1.0,
            flags: 0,
            fuse: 0,
            side: 0,
            palette_remap: String::new(),
            damage: DamageInfo::default(),
            states: StateGroup::new(),
            spawn_state: StateIndex::NULL,
            idle_state: StateIndex::NULL,
            death_state: StateIndex::NULL,
        }
    }

    /// Returns true if every bit of `flag` is set.
    #[must_use]
    pub fn has_flag(&self, flag: u32) -> bool {
        self.flags & flag == flag
    }
}

impl Default for ThingDefinition {
    fn default() -> Self {
        Self::named("")
    }
}

impl Named for ThingDefinition {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Field table for `<THINGS>`.
#[must_use]
pub fn thing_fields() -> FieldTable<ThingDefinition> {
    FieldTable::new()
        .float("SPAWNHEALTH", |t: &mut ThingDefinition| &mut t.spawn_health)
        .float("SPEED", |t: &mut ThingDefinition| &mut t.speed)
        .percent_any("FAST", |t: &mut ThingDefinition| &mut t.fast)
        .float("RADIUS", |t: &mut ThingDefinition| &mut t.radius)
        .float("HEIGHT", |t: &mut ThingDefinition| &mut t.height)
        .float("MASS", |t: &mut ThingDefinition| &mut t.mass)
        .time("REACTION_TIME", |t: &mut ThingDefinition| &mut t.reaction_time)
        .percent("TRANSLUCENCY", |t: &mut ThingDefinition| &mut t.translucency)
        .flags("SPECIAL", |t: &mut ThingDefinition| &mut t.flags, THING_FLAGS)
        .time("FUSE", |t: &mut ThingDefinition| &mut t.fuse)
        // Older name for FUSE.
        .time("LIFESPAN", |t: &mut ThingDefinition| &mut t.fuse)
        .bitset("SIDE", |t: &mut ThingDefinition| &mut t.side)
        .lump_name("PALETTE_REMAP", |t: &mut ThingDefinition| &mut t.palette_remap)
        .sub_table(
            "DAMAGE",
            |t: &mut ThingDefinition| &mut t.damage,
            damage_fields(),
        )
}

/// Splits `NAME:NUMBER`.
pub(crate) fn split_entry_name(entry: &str) -> Result<(&str, Option<i32>)> {
    let (name, number) = match entry.split_once(':') {
        Some((name, number)) => (name.trim(), Some(parse_numeric(number)?)),
        None => (entry.trim(), None),
    };
    if name.is_empty() {
        return Err(Error::syntax("entry without a name"));
    }
    Ok((name, number))
}

struct Current {
    def: ThingDefinition,
    /// Index of the definition this entry replaces, if any.
    replaces: Option<usize>,
}

/// Reader for `<THINGS>` files.
pub struct ThingReader<'a> {
    things: &'a mut DefinitionContainer<ThingDefinition>,
    arena: &'a mut StateArena,
    fields: &'a FieldTable<ThingDefinition>,
    engine: StateEngine,
    current: Option<Current>,
}

impl<'a> ThingReader<'a> {
    /// Creates a reader adding to `things` and `arena`.
    pub fn new(
        things: &'a mut DefinitionContainer<ThingDefinition>,
        arena: &'a mut StateArena,
        fields: &'a FieldTable<ThingDefinition>,
    ) -> Self {
        Self {
            things,
            arena,
            fields,
            engine: StateEngine::new(),
            current: None,
        }
    }

    fn current(&mut self) -> Result<&mut Current> {
        self.current
            .as_mut()
            .ok_or_else(|| Error::new(ErrorKind::Internal("field outside an entry".to_string())))
    }
}

impl DdfReader for ThingReader<'_> {
    fn tag(&self) -> &str {
        "THINGS"
    }

    fn short_name(&self) -> &str {
        "things"
    }

    fn start_entry(&mut self, name: &str, extend: bool, _diag: &mut Diagnostics) -> Result<()> {
        let (name, number) = split_entry_name(name)?;
        let replaces = self.things.index_of(name);

        let mut def = if extend {
            replaces
                .and_then(|index| self.things.get(index))
                .cloned()
                .ok_or_else(|| Error::unresolved(name, "thing to extend"))?
        } else {
            ThingDefinition::named(name)
        };
        if let Some(number) = number {
            def.number = number;
        }

        self.engine.begin_group(if extend {
            def.states.clone()
        } else {
            StateGroup::new()
        });
        self.current = Some(Current { def, replaces });
        Ok(())
    }

    fn parse_field(&mut self, field: &Field<'_>, diag: &mut Diagnostics) -> Result<()> {
        if let Some((command, label)) = field.command_argument() {
            if names_match(command, "STATES") {
                self.current()?;
                return self.engine.read_field_value(
                    self.arena,
                    THING_ACTIONS,
                    label,
                    field.value,
                    field.index,
                    field.is_last,
                    diag,
                );
            }
        }

        let fields = self.fields;
        let current = self.current()?;
        if !fields.bind(&mut current.def, field.command, field.value, diag)? {
            diag.complain(Error::unknown_field(field.command))?;
        }
        Ok(())
    }

    fn finish_entry(&mut self, diag: &mut Diagnostics) -> Result<()> {
        let Some(Current { mut def, replaces }) = self.current.take() else {
            return Ok(());
        };

        def.states = match self.engine.finish_group(self.arena) {
            Ok(states) => states,
            Err(err) => {
                self.engine.abort_group();
                return Err(err);
            }
        };
        def.spawn_state = lookup_label(&def.states, "SPAWN", true)?.unwrap_or_default();
        def.idle_state = lookup_label(&def.states, "IDLE", true)?.unwrap_or_default();
        def.death_state = lookup_label(&def.states, "DEATH", true)?.unwrap_or_default();
        if def.spawn_state.is_null() {
            diag.warn(format!("thing {} has no SPAWN states", def.name));
        }

        log::trace!("thing {} finished with {} ranges", def.name, def.states.ranges().len());
        match replaces.and_then(|index| self.things.get_mut(index)) {
            Some(slot) => *slot = def,
            None => {
                self.things.push(def);
            }
        }
        Ok(())
    }

    fn clear_all(&mut self, _diag: &mut Diagnostics) -> Result<()> {
        log::debug!("#CLEARALL: dropping {} things", self.things.len());
        self.things.clear();
        Ok(())
    }

    fn abort_entry(&mut self) {
        self.engine.abort_group();
        self.current = None;
    }
}
