//! `<LINES>`: numbered linedef specials.

use ddf_binding::{FieldTable, FlagDef, RGB_NO_VALUE, parse_numeric};
use ddf_foundation::{Diagnostics, Error, ErrorKind, Result};
use ddf_language::{DdfReader, Field};
use ddf_storage::{Numbered, NumericContainer};

/// Can be activated more than once.
pub const LINE_REPEATABLE: u32 = 1 << 0;
/// Monsters may trigger it.
pub const LINE_MONSTERS: u32 = 1 << 1;
/// Needs a key.
pub const LINE_LOCKED: u32 = 1 << 2;
/// Breaks on the first use, clearing the special.
pub const LINE_ONE_SHOT: u32 = 1 << 3;

/// Flags accepted by `SPECIAL`.
pub const LINE_FLAGS: &[FlagDef] = &[
    FlagDef::new("REPEATABLE", LINE_REPEATABLE),
    FlagDef::new("MONSTERS", LINE_MONSTERS),
    FlagDef::new("LOCKED", LINE_LOCKED),
    FlagDef::new("ONE_SHOT", LINE_ONE_SHOT),
    FlagDef::negative("MULTIPLE", LINE_ONE_SHOT),
];

/// `FLOOR.*` movement settings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlaneMover {
    /// Units per tic going up.
    pub speed_up: f32,
    /// Units per tic going down.
    pub speed_down: f32,
    /// Tics to wait at the destination.
    pub wait: i32,
    /// Tilt once finished.
    pub slope: f32,
}

fn plane_fields() -> FieldTable<PlaneMover> {
    FieldTable::new()
        .float("SPEED_UP", |p: &mut PlaneMover| &mut p.speed_up)
        .float("SPEED_DOWN", |p: &mut PlaneMover| &mut p.speed_down)
        .time("WAIT", |p: &mut PlaneMover| &mut p.wait)
        .slope("SLOPE", |p: &mut PlaneMover| &mut p.slope)
}

/// One `[NUMBER]` entry of `<LINES>`.
#[derive(Clone, Debug, PartialEq)]
pub struct LineType {
    /// Line special number.
    pub number: i32,
    /// Activations allowed, -1 for unlimited.
    pub count: i32,
    /// Automap colour, or [`RGB_NO_VALUE`].
    pub colour: u32,
    /// `LINE_*` bits.
    pub flags: u32,
    /// Scroll speed.
    pub speed: f32,
    /// Tics before the effect starts.
    pub delay: i32,
    /// Which sides may trigger it (`A` = players, `B` = monsters, ...).
    pub activators: u32,
    /// Direction of scrolling textures.
    pub scroll_angle: u32,
    /// Floor mover.
    pub floor: PlaneMover,
    /// Ceiling mover.
    pub ceiling: PlaneMover,
}

impl LineType {
    /// Creates a line type with default values.
    #[must_use]
    pub fn numbered(number: i32) -> Self {
        Self {
            number,
            count: -1,
            colour: RGB_NO_VALUE,
            flags: 0,
            speed: 0.0,
            delay: 0,
            activators: 0,
            scroll_angle: 0,
            floor: PlaneMover::default(),
            ceiling: PlaneMover::default(),
        }
    }
}

impl Numbered for LineType {
    fn number(&self) -> i32 {
        self.number
    }
}

/// Field table for `<LINES>`.
#[must_use]
pub fn line_fields() -> FieldTable<LineType> {
    FieldTable::new()
        .numeric("COUNT", |l: &mut LineType| &mut l.count)
        .rgb("COLOUR", |l: &mut LineType| &mut l.colour)
        .flags("SPECIAL", |l: &mut LineType| &mut l.flags, LINE_FLAGS)
        .float("SPEED", |l: &mut LineType| &mut l.speed)
        .time("DELAY", |l: &mut LineType| &mut l.delay)
        .bitset("ACTIVATORS", |l: &mut LineType| &mut l.activators)
        .angle("SCROLL_ANGLE", |l: &mut LineType| &mut l.scroll_angle)
        .sub_table("FLOOR", |l: &mut LineType| &mut l.floor, plane_fields())
        .sub_table("CEILING", |l: &mut LineType| &mut l.ceiling, plane_fields())
}

/// Reader for `<LINES>` files.
pub struct LineReader<'a> {
    lines: &'a mut NumericContainer<LineType>,
    fields: &'a FieldTable<LineType>,
    current: Option<(LineType, Option<usize>)>,
}

impl<'a> LineReader<'a> {
    /// Creates a reader adding to `lines`.
    pub fn new(lines: &'a mut NumericContainer<LineType>, fields: &'a FieldTable<LineType>) -> Self {
        Self {
            lines,
            fields,
            current: None,
        }
    }
}

impl DdfReader for LineReader<'_> {
    fn tag(&self) -> &str {
        "LINES"
    }

    fn short_name(&self) -> &str {
        "lines"
    }

    fn start_entry(&mut self, name: &str, extend: bool, _diag: &mut Diagnostics) -> Result<()> {
        let number = parse_numeric(name)?;
        let replaces = self.lines.index_of(number);
        let def = if extend {
            replaces
                .and_then(|index| self.lines.get(index))
                .cloned()
                .ok_or_else(|| Error::unresolved(name.trim(), "line type to extend"))?
        } else {
            LineType::numbered(number)
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
        if !self.fields.bind(def, field.command, field.value, diag)? {
            diag.complain(Error::unknown_field(field.command))?;
        }
        Ok(())
    }

    fn finish_entry(&mut self, _diag: &mut Diagnostics) -> Result<()> {
        let Some((def, replaces)) = self.current.take() else {
            return Ok(());
        };
        match replaces.and_then(|index| self.lines.get_mut(index)) {
            Some(slot) => *slot = def,
            None => {
                self.lines.push(def);
            }
        }
        Ok(())
    }

    fn clear_all(&mut self, _diag: &mut Diagnostics) -> Result<()> {
        self.lines.clear();
        Ok(())
    }

    fn abort_entry(&mut self) {
        self.current = None;
    }
}
