//! Building state groups and resolving redirectors.
//!
//! States are built in two passes. While an entry is parsed, each
//! `STATES(LABEL) = item, item, ...;` field opens a [`StateRange`] and
//! appends its states to the [`StateArena`]. A `#LABEL[:OFFSET]`
//! redirector cannot be resolved yet (the label may be defined further
//! down), so it is recorded as a pending [`Redirector`] and the state's
//! link field is set to an encoded placeholder:
//!
//! | raw value                     | meaning                                 |
//! |-------------------------------|-----------------------------------------|
//! | `0`                           | fall through to the next slot           |
//! | `-1`                          | remove (becomes the null state)         |
//! | `(redirector + 1) << 16 \| n` | redirector number, offset `n`           |
//!
//! When the entry finishes, [`StateEngine::finish_group`] rewrites every
//! placeholder into an absolute [`StateIndex`]. Falling through from the
//! last state of a range loops back to the range's first state.

use ddf_binding::{decode_brackets, parse_numeric, split_list};
use ddf_foundation::{Diagnostics, Error, ErrorKind, Result, names_match, strip_name_prefix};

use crate::action::{ActionTable, ArgKind, parse_arg, parse_jump};
use crate::arena::{StateArena, StateGroup, StateRange};
use crate::state::{ActionArg, ActionCall, Frame, State, StateIndex};

const REDIRECT_SHIFT: u32 = 16;
const OFFSET_MASK: i32 = 0xFFFF;
const MAX_REDIRECTORS: usize = 0x7FFE;
const REMOVE_LINK: i32 = -1;

/// Brightness of `NORMAL` states.
pub const BRIGHT_NORMAL: u8 = 0;
/// Brightness of `BRIGHT` states.
pub const BRIGHT_FULL: u8 = 255;

/// A label reference waiting to be resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Redirector {
    /// Target label.
    pub label: String,
    /// States to skip past the label's first state.
    pub offset: i32,
}

/// Looks up a label within a group.
///
/// The search is most-recent-first. A missing `IDLE` falls back to
/// `SPAWN`. With `quiet`, a miss returns `Ok(None)` instead of an error.
///
/// # Errors
///
/// Returns `UnknownLabel` for a miss when not `quiet`.
pub fn lookup_label(group: &StateGroup, label: &str, quiet: bool) -> Result<Option<StateIndex>> {
    if let Some(index) = group.find_label(label) {
        return Ok(Some(index));
    }
    if names_match(label, "IDLE") {
        if let Some(index) = group.find_label("SPAWN") {
            return Ok(Some(index));
        }
    }
    if quiet {
        Ok(None)
    } else {
        Err(Error::unknown_label(label))
    }
}

/// Position of the range [`lookup_label`] would pick for `label`.
fn range_position(group: &StateGroup, label: &str) -> Option<usize> {
    let find = |name: &str| {
        group
            .ranges()
            .iter()
            .rposition(|r| names_match(&r.label, name))
    };
    find(label).or_else(|| names_match(label, "IDLE").then(|| find("SPAWN")).flatten())
}

/// Parses `NORMAL`, `BRIGHT` or `LITnn`.
fn parse_brightness(text: &str) -> Result<u8> {
    let text = text.trim();
    if names_match(text, "NORMAL") {
        return Ok(BRIGHT_NORMAL);
    }
    if names_match(text, "BRIGHT") {
        return Ok(BRIGHT_FULL);
    }
    if let Some(level) = strip_name_prefix(text, "LIT") {
        let level = parse_numeric(level)?;
        if (0..=99).contains(&level) {
            return Ok(u8::try_from(level * 255 / 99).unwrap_or(BRIGHT_FULL));
        }
    }
    Err(Error::bad_value("brightness", text))
}

/// Parses a frame field into one or more frames.
fn parse_frames(text: &str) -> Result<Vec<Frame>> {
    let text = text.trim();
    if let Some(model) = text.strip_prefix('@') {
        if model.is_empty() {
            return Err(Error::bad_state("empty model frame"));
        }
        if model.starts_with(|c: char| c.is_ascii_digit()) {
            return Ok(vec![Frame::ModelNumber(parse_numeric(model)?)]);
        }
        return Ok(vec![Frame::ModelName(model.to_string())]);
    }
    if text.is_empty() {
        return Err(Error::bad_state("missing frame"));
    }
    text.bytes()
        .map(|b| {
            if b.is_ascii_uppercase() {
                Ok(Frame::Sprite(b - b'A'))
            } else {
                Err(Error::bad_state(format!("bad frame '{text}'")))
            }
        })
        .collect()
}

/// Splits `LABEL[:OFFSET]` into its parts.
fn parse_redirect(text: &str) -> Result<Redirector> {
    let (label, offset) = text.split_once(':').unwrap_or((text, ""));
    parse_redirect_parts(label, offset)
}

fn parse_redirect_parts(label: &str, offset: &str) -> Result<Redirector> {
    let label = label.trim();
    if label.is_empty() {
        return Err(Error::bad_state("redirector without a label"));
    }
    let offset = if offset.trim().is_empty() {
        0
    } else {
        parse_numeric(offset)?
    };
    if !(0..=OFFSET_MASK).contains(&offset) {
        return Err(Error::bad_state(format!("bad redirector offset {offset}")));
    }
    Ok(Redirector {
        label: label.to_string(),
        offset,
    })
}

/// Builder for the state group of the entry being parsed.
#[derive(Debug, Default)]
pub struct StateEngine {
    group: StateGroup,
    /// Ranges before this position were resolved by an earlier entry.
    first_new_range: usize,
    range_open: bool,
    pending: Vec<Redirector>,
    /// `(range position, redirector)` for ranges that only redirect.
    aliases: Vec<(usize, usize)>,
}

impl StateEngine {
    /// Creates an idle engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts building a group, on top of `existing` ranges when an entry
    /// is extended.
    pub fn begin_group(&mut self, existing: StateGroup) {
        self.first_new_range = existing.ranges().len();
        self.group = existing;
        self.range_open = false;
        self.pending.clear();
        self.aliases.clear();
    }

    /// Returns true while a range is being read.
    #[must_use]
    pub fn range_open(&self) -> bool {
        self.range_open
    }

    /// Returns the redirectors waiting for resolution.
    #[must_use]
    pub fn pending(&self) -> &[Redirector] {
        &self.pending
    }

    /// Opens a new range with the given label.
    pub fn begin_range(&mut self, arena: &StateArena, label: &str) {
        if self.range_open {
            self.close_range();
        }
        self.group.ranges_mut().push(StateRange {
            label: label.trim().to_string(),
            first: arena.next_index(),
            count: 0,
        });
        self.range_open = true;
    }

    /// Closes the active range. A range that ended up with no states and
    /// no redirector is discarded.
    pub fn close_range(&mut self) {
        if !self.range_open {
            return;
        }
        self.range_open = false;
        let position = self.group.ranges().len() - 1;
        let empty = self.group.ranges()[position].count == 0;
        if empty && !self.is_alias(position) {
            let range = self.group.ranges_mut().pop();
            log::trace!("dropping empty state range {:?}", range.map(|r| r.label));
        }
    }

    /// Handles one value of a `STATES(LABEL)` field: the first value opens
    /// the range and the last one closes it.
    ///
    /// # Errors
    ///
    /// See [`read_state`](Self::read_state).
    #[allow(clippy::too_many_arguments)]
    pub fn read_field_value(
        &mut self,
        arena: &mut StateArena,
        actions: ActionTable,
        label: &str,
        item: &str,
        index: usize,
        is_last: bool,
        diag: &mut Diagnostics,
    ) -> Result<()> {
        if index == 0 || !self.range_open {
            self.begin_range(arena, label);
        }
        self.read_state(arena, actions, item, diag)?;
        if is_last {
            self.close_range();
        }
        Ok(())
    }

    fn is_alias(&self, position: usize) -> bool {
        self.aliases.iter().any(|&(range, _)| range == position)
    }

    fn active_range(&mut self) -> Result<(usize, &mut StateRange)> {
        if !self.range_open {
            return Err(Error::new(ErrorKind::Internal(
                "state read outside a range".to_string(),
            )));
        }
        let ranges = self.group.ranges_mut();
        let position = ranges.len() - 1;
        Ok((position, &mut ranges[position]))
    }

    fn push_redirector(&mut self, redirector: Redirector) -> Result<i32> {
        if self.pending.len() >= MAX_REDIRECTORS {
            return Err(Error::bad_state("too many redirectors in one entry"));
        }
        let offset = redirector.offset;
        self.pending.push(redirector);
        let number = i32::try_from(self.pending.len()).unwrap_or(i32::MAX);
        Ok((number << REDIRECT_SHIFT) | offset)
    }

    /// Reads one state item into the active range.
    ///
    /// Accepted forms: `SPRITE:FRAMES:TICS:BRIGHT[:ACTION[(ARG)]][:#LABEL[:OFFSET]]`,
    /// a bare `#LABEL[:OFFSET]` linking the previous state, and `#REMOVE`.
    ///
    /// # Errors
    ///
    /// Malformed items are fatal. Unknown actions follow the strict/lax
    /// policy and are dropped in lax mode.
    pub fn read_state(
        &mut self,
        arena: &mut StateArena,
        actions: ActionTable,
        item: &str,
        diag: &mut Diagnostics,
    ) -> Result<()> {
        let item = item.trim();
        if item.is_empty() {
            return Err(Error::bad_state("empty state"));
        }

        if let Some(target) = item.strip_prefix('#') {
            let (position, range) = self.active_range()?;
            let last = range.last();
            if names_match(target, "REMOVE") {
                if let Some(last) = last {
                    link_mut(arena, last)?.next = REMOVE_LINK;
                }
                return Ok(());
            }
            let redirector = parse_redirect(target)?;
            let link = self.push_redirector(redirector)?;
            match last {
                Some(last) => link_mut(arena, last)?.next = link,
                None => {
                    if self.is_alias(position) {
                        return Err(Error::bad_state("range redirects twice"));
                    }
                    self.aliases.push((position, self.pending.len() - 1));
                    self.group.ranges_mut()[position].first = StateIndex::NULL;
                }
            }
            return Ok(());
        }

        let parts = split_list(item, ':');
        if parts.len() < 4 {
            return Err(Error::bad_state(format!(
                "'{item}' is not SPRITE:FRAME:TICS:BRIGHTNESS"
            )));
        }
        let (position, _) = self.active_range()?;
        if self.is_alias(position) {
            return Err(Error::bad_state(format!(
                "'{item}' follows a range redirect"
            )));
        }
        let sprite = parts[0].trim();
        if sprite.is_empty() {
            return Err(Error::bad_state("missing sprite"));
        }
        let frames = parse_frames(parts[1])?;
        let tics = parse_numeric(parts[2])?;
        let bright = parse_brightness(parts[3])?;

        let mut rest = &parts[4..];
        let mut next = 0;
        if let Some(pos) = rest.iter().position(|p| p.trim_start().starts_with('#')) {
            if rest.len() > pos + 2 {
                return Err(Error::bad_state(format!("junk after redirector in '{item}'")));
            }
            let target = &rest[pos].trim_start()[1..];
            next = if names_match(target, "REMOVE") {
                REMOVE_LINK
            } else {
                let redirector =
                    parse_redirect_parts(target, rest.get(pos + 1).copied().unwrap_or(""))?;
                self.push_redirector(redirector)?
            };
            rest = &rest[..pos];
        }
        if rest.len() > 1 {
            return Err(Error::bad_state(format!("too many fields in '{item}'")));
        }

        let mut action = None;
        let mut jump = 0;
        if let Some(text) = rest.first().map(|t| t.trim()).filter(|t| !t.is_empty()) {
            if let Some((call, target)) = parse_action(text, actions, diag)? {
                if let Some(target) = target {
                    jump = self.push_redirector(target)?;
                }
                action = Some(call);
            }
        }

        let sprite = arena.intern_sprite(sprite);
        let count = frames.len();
        let mut last = StateIndex::NULL;
        for frame in frames {
            let mut state = State::new(sprite, frame, tics, bright);
            state.action.clone_from(&action);
            state.jump = jump;
            last = arena.push(state);
        }
        self.active_range()?.1.count += count;
        if next != 0 {
            link_mut(arena, last)?.next = next;
        }
        Ok(())
    }

    /// Resolves every redirector of the group and returns it.
    ///
    /// Any open range is closed first. Labels are looked up across the
    /// whole group, most recently defined range first.
    ///
    /// # Errors
    ///
    /// Returns `UnknownLabel` for a redirector naming no range, or
    /// `BadState` if an offset runs past the end of the arena.
    pub fn finish_group(&mut self, arena: &mut StateArena) -> Result<StateGroup> {
        self.close_range();

        self.resolve_aliases(arena)?;

        let group = &self.group;
        for range in &group.ranges()[self.first_new_range..] {
            let Some(last) = range.last() else { continue };
            for index in range.first.get()..=last.get() {
                let slot = StateIndex::new(index);
                let state = link_mut(arena, slot)?;
                let (next, jump) = (state.next, state.jump);

                let next = match next {
                    0 if slot == last => range.first.get(),
                    0 => index + 1,
                    REMOVE_LINK => 0,
                    raw => self.resolve_link(arena, raw)?,
                };
                let jump = match jump {
                    0 | REMOVE_LINK => 0,
                    raw => self.resolve_link(arena, raw)?,
                };

                let state = link_mut(arena, slot)?;
                state.next = to_link(next)?;
                state.jump = to_link(jump)?;
            }
        }

        log::trace!(
            "resolved {} redirectors over {} ranges",
            self.pending.len(),
            self.group.ranges().len()
        );
        self.pending.clear();
        self.aliases.clear();
        self.first_new_range = 0;
        Ok(std::mem::take(&mut self.group))
    }

    /// Points every alias range at its target, following aliases of aliases.
    fn resolve_aliases(&mut self, arena: &StateArena) -> Result<()> {
        let mut unresolved = self.aliases.clone();
        while !unresolved.is_empty() {
            let mut waiting = Vec::new();
            for &(position, redirector) in &unresolved {
                let blocked = {
                    let label = &self.redirector(redirector)?.label;
                    range_position(&self.group, label)
                        .is_some_and(|target| unresolved.iter().any(|&(p, _)| p == target))
                };
                if blocked {
                    waiting.push((position, redirector));
                } else {
                    let target = self.resolve(arena, redirector)?;
                    self.group.ranges_mut()[position].first = StateIndex::new(target);
                }
            }
            if waiting.len() == unresolved.len() {
                let label = &self.redirector(waiting[0].1)?.label;
                return Err(Error::bad_state(format!("#{label} redirects in a cycle")));
            }
            unresolved = waiting;
        }
        Ok(())
    }

    fn redirector(&self, redirector: usize) -> Result<&Redirector> {
        self.pending.get(redirector).ok_or_else(|| {
            Error::new(ErrorKind::Internal(format!(
                "redirector {redirector} was never recorded"
            )))
        })
    }

    fn resolve_link(&self, arena: &StateArena, raw: i32) -> Result<usize> {
        let number = raw >> REDIRECT_SHIFT;
        if number <= 0 {
            // Already an absolute index.
            return usize::try_from(raw).map_err(|_| Error::bad_state("negative state link"));
        }
        let redirector = usize::try_from(number - 1).unwrap_or(usize::MAX);
        self.resolve(arena, redirector)
    }

    fn resolve(&self, arena: &StateArena, redirector: usize) -> Result<usize> {
        let pending = self.redirector(redirector)?;
        let base = lookup_label(&self.group, &pending.label, false)?
            .map_or(0, StateIndex::get);
        let target = base + usize::try_from(pending.offset).unwrap_or(0);
        if target >= arena.len() {
            return Err(Error::bad_state(format!(
                "#{}:{} is past the last state",
                pending.label, pending.offset
            )));
        }
        Ok(target)
    }

    /// Discards the group being built after an error.
    ///
    /// States already pushed to the arena stay there unreferenced; no range
    /// is left open.
    pub fn abort_group(&mut self) {
        if self.range_open || !self.pending.is_empty() {
            log::debug!("aborting state group with {} pending redirectors", self.pending.len());
        }
        self.group = StateGroup::new();
        self.first_new_range = 0;
        self.range_open = false;
        self.pending.clear();
        self.aliases.clear();
    }
}

fn link_mut(arena: &mut StateArena, index: StateIndex) -> Result<&mut State> {
    arena
        .get_mut(index)
        .ok_or_else(|| Error::new(ErrorKind::Internal(format!("no state {index:?}"))))
}

fn to_link(index: usize) -> Result<i32> {
    i32::try_from(index).map_err(|_| Error::bad_state("state index overflow"))
}

/// Parses `ACTION` or `ACTION(ARG)`.
///
/// Returns the call and, for jump actions, the redirector of the jump.
fn parse_action(
    text: &str,
    actions: ActionTable,
    diag: &mut Diagnostics,
) -> Result<Option<(ActionCall, Option<Redirector>)>> {
    let (name, arg) = if text.contains('(') {
        decode_brackets(text)?
    } else {
        (text, "")
    };

    let Some(code) = actions.lookup(name) else {
        diag.complain(Error::new(ErrorKind::UnknownAction(name.to_string())))?;
        return Ok(None);
    };

    let mut target = None;
    let arg = match code.arg {
        ArgKind::Jump => {
            let jump = parse_jump(arg, diag)?;
            target = Some(parse_redirect_parts(jump.label, jump.offset)?);
            ActionArg::Jump {
                chance: jump.chance,
            }
        }
        _ if arg.trim().is_empty() => ActionArg::None,
        ArgKind::None => {
            diag.warn(format!("action {} takes no argument", code.name));
            ActionArg::None
        }
        kind => parse_arg(kind, arg, diag)?,
    };

    Ok(Some((
        ActionCall {
            name: code.name.to_string(),
            arg,
        },
        target,
    )))
}
