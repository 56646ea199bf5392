//! State groups end to end: DDF text → driver → engine → arena.

use ddf_foundation::{Diagnostics, ErrorKind, LoadConfig, Result, names_match};
use ddf_language::{DdfReader, Field, Session};
use ddf_states::{
    ActionArg, ActionCode, ActionTable, ArgKind, BRIGHT_FULL, BRIGHT_NORMAL, Frame, StateArena,
    StateEngine, StateGroup, StateIndex, lookup_label,
};
use pretty_assertions::assert_eq;

const ACTIONS: ActionTable = ActionTable::new(&[
    ActionCode::new("LOOK", ArgKind::None),
    ActionCode::new("JUMP", ArgKind::Jump),
    ActionCode::new("PLAYSOUND", ArgKind::String),
    ActionCode::new("TRANS_SET", ArgKind::Percent),
]);

/// A minimal domain whose entries only carry states.
#[derive(Default)]
struct Anims {
    arena: StateArena,
    engine: StateEngine,
    current: Option<String>,
    groups: Vec<(String, StateGroup)>,
}

impl Anims {
    fn group(&self, name: &str) -> &StateGroup {
        &self
            .groups
            .iter()
            .rev()
            .find(|(n, _)| names_match(n, name))
            .unwrap()
            .1
    }
}

impl DdfReader for Anims {
    fn tag(&self) -> &str {
        "ANIMS"
    }

    fn short_name(&self) -> &str {
        "anims"
    }

    fn start_entry(&mut self, name: &str, extend: bool, _: &mut Diagnostics) -> Result<()> {
        let existing = if extend {
            self.group(name).clone()
        } else {
            StateGroup::new()
        };
        self.engine.begin_group(existing);
        self.current = Some(name.to_string());
        Ok(())
    }

    fn parse_field(&mut self, field: &Field<'_>, diag: &mut Diagnostics) -> Result<()> {
        let (_, label) = field.command_argument().unwrap();
        self.engine.read_field_value(
            &mut self.arena,
            ACTIONS,
            label,
            field.value,
            field.index,
            field.is_last,
            diag,
        )
    }

    fn finish_entry(&mut self, _: &mut Diagnostics) -> Result<()> {
        let name = self.current.take().unwrap_or_default();
        match self.engine.finish_group(&mut self.arena) {
            Ok(group) => {
                self.groups.push((name, group));
                Ok(())
            }
            Err(err) => {
                self.engine.abort_group();
                Err(err)
            }
        }
    }

    fn clear_all(&mut self, _: &mut Diagnostics) -> Result<()> {
        self.groups.clear();
        Ok(())
    }

    fn abort_entry(&mut self) {
        self.engine.abort_group();
        self.current = None;
    }
}

fn load(config: LoadConfig, text: &str) -> (Result<()>, Anims, Session) {
    let mut session = Session::new(config.with_log_warnings(false));
    let mut anims = Anims::default();
    let result = session
        .parse_file(&mut anims, "anims.ddf", text)
        .map(|_| ());
    (result, anims, session)
}

// =============================================================================
// Linking
// =============================================================================

#[test]
fn two_frame_loop_round_trip() {
    let (result, anims, _) = load(
        LoadConfig::strict(),
        "<ANIMS>\n[TORCH]\nSTATES(SPAWN) = TRCH:A:4:BRIGHT, TRCH:B:4:BRIGHT;\n",
    );
    result.unwrap();
    let group = anims.group("TORCH");
    let a = group.find_label("SPAWN").unwrap();
    let b = anims.arena.get(a).unwrap().next_state();
    assert_eq!(b, StateIndex::new(a.get() + 1));
    assert_eq!(anims.arena.get(b).unwrap().next_state(), a);
    assert_eq!(anims.arena.get(a).unwrap().bright, BRIGHT_FULL);
    assert_eq!(anims.arena.sprite_name(anims.arena.get(a).unwrap().sprite), Some("TRCH"));
}

#[test]
fn forward_and_backward_redirectors() {
    let (result, anims, _) = load(
        LoadConfig::strict(),
        "<ANIMS>\n[IMP]\n\
         STATES(SPAWN) = TROO:A:10:NORMAL:LOOK, TROO:B:10:NORMAL:LOOK:#CHASE;\n\
         STATES(CHASE) = TROO:C:3:NORMAL,\n    TROO:D:3:NORMAL,\n    #SPAWN:1;\n",
    );
    result.unwrap();
    let group = anims.group("IMP");
    let spawn = group.find_range("SPAWN").unwrap();
    let chase = group.find_range("CHASE").unwrap();

    let spawn_last = anims.arena.get(spawn.last().unwrap()).unwrap();
    assert_eq!(spawn_last.next_state(), chase.first);
    let chase_last = anims.arena.get(chase.last().unwrap()).unwrap();
    assert_eq!(chase_last.next_state(), StateIndex::new(spawn.first.get() + 1));
    assert_eq!(spawn_last.action.as_ref().map(|a| a.name.as_str()), Some("LOOK"));
}

#[test]
fn jump_actions_link_their_target() {
    let (result, anims, _) = load(
        LoadConfig::strict(),
        "<ANIMS>[SKULL]\n\
         STATES(SPAWN) = SKUL:A:5:LIT50:JUMP(ATTACK:1,25%), SKUL:B:5:NORMAL;\n\
         STATES(ATTACK) = SKUL:C:5:NORMAL:PLAYSOUND(DSSKLATK), SKUL:D:5:NORMAL:TRANS_SET(50%);\n",
    );
    result.unwrap();
    let group = anims.group("SKULL");
    let spawn = anims.arena.get(group.find_label("SPAWN").unwrap()).unwrap();
    let attack = group.find_label("ATTACK").unwrap();

    assert_eq!(spawn.jump_state(), StateIndex::new(attack.get() + 1));
    assert_eq!(spawn.bright, 128);
    let call = spawn.action.as_ref().unwrap();
    assert_eq!(call.arg, ActionArg::Jump { chance: 0.25 });

    let sound = anims.arena.get(attack).unwrap();
    assert_eq!(
        sound.action.as_ref().unwrap().arg,
        ActionArg::String("DSSKLATK".into())
    );
    assert_eq!(sound.jump_state(), StateIndex::NULL);
    let fade = anims.arena.get(StateIndex::new(attack.get() + 1)).unwrap();
    assert_eq!(fade.action.as_ref().unwrap().arg, ActionArg::Percent(0.5));
}

#[test]
fn model_frames() {
    let (result, anims, _) = load(
        LoadConfig::strict(),
        "<ANIMS>[ROBOT] STATES(SPAWN) = ROBO:@3:2:NORMAL, ROBO:@walk:2:NORMAL;",
    );
    result.unwrap();
    let first = anims.group("ROBOT").find_label("SPAWN").unwrap();
    assert_eq!(anims.arena.get(first).unwrap().frame, Frame::ModelNumber(3));
    let second = anims.arena.get(StateIndex::new(first.get() + 1)).unwrap();
    assert_eq!(second.frame, Frame::ModelName("walk".into()));
    assert_eq!(second.bright, BRIGHT_NORMAL);
}

// =============================================================================
// Removal and Labels
// =============================================================================

#[test]
fn remove_only_range_disappears() {
    let (result, anims, _) = load(
        LoadConfig::strict(),
        "<ANIMS>[BARREL]\nSTATES(SPAWN) = BAR1:AB:6:NORMAL;\nSTATES(PAIN) = #REMOVE;\n",
    );
    result.unwrap();
    let group = anims.group("BARREL");
    assert_eq!(group.ranges().len(), 1);
    assert!(group.find_label("PAIN").is_none());
}

#[test]
fn remove_ends_the_sequence() {
    let (result, anims, _) = load(
        LoadConfig::strict(),
        "<ANIMS>[PUFF] STATES(SPAWN) = PUFF:ABCD:4:BRIGHT, #REMOVE;",
    );
    result.unwrap();
    let spawn = anims.group("PUFF").find_label("SPAWN").unwrap();
    assert_eq!(anims.arena.walk(spawn, 100).len(), 4);
}

#[test]
fn labels_resolve_most_recent_first_with_idle_fallback() {
    let (result, anims, _) = load(
        LoadConfig::strict(),
        "<ANIMS>[A]\nSTATES(SPAWN) = X:A:1:NORMAL;\nSTATES(SPAWN) = X:B:1:NORMAL;\n",
    );
    result.unwrap();
    let group = anims.group("A");
    let newest = group.ranges()[1].first;
    assert_eq!(lookup_label(group, "spawn", false).unwrap(), Some(newest));
    assert_eq!(lookup_label(group, "IDLE", false).unwrap(), Some(newest));
    assert_eq!(lookup_label(group, "DEATH", true).unwrap(), None);
    assert!(lookup_label(group, "DEATH", false).is_err());
}

#[test]
fn unknown_label_is_fatal_even_when_lax() {
    let (result, mut anims, _) = load(
        LoadConfig::lax(),
        "<ANIMS>[A] STATES(SPAWN) = X:A:1:NORMAL:#NOWHERE;",
    );
    let err = result.unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownLabel("NOWHERE".into()));
    assert!(anims.groups.is_empty());
    assert!(!anims.engine.range_open());
    assert!(anims.engine.pending().is_empty());

    // The engine is reusable after the failure.
    anims.engine.begin_group(StateGroup::new());
    assert!(anims.engine.finish_group(&mut anims.arena).unwrap().is_empty());
}

#[test]
fn unknown_action_policy() {
    let text = "<ANIMS>[A] STATES(SPAWN) = X:A:1:NORMAL:FLY;";

    let (result, _, _) = load(LoadConfig::strict(), text);
    assert_eq!(result.unwrap_err().kind, ErrorKind::UnknownAction("FLY".into()));

    let (result, anims, session) = load(LoadConfig::lax(), text);
    result.unwrap();
    let spawn = anims.group("A").find_label("SPAWN").unwrap();
    assert!(anims.arena.get(spawn).unwrap().action.is_none());
    assert_eq!(session.diagnostics().warning_count(), 1);
}

#[test]
fn extending_adds_ranges_without_touching_old_ones() {
    let (result, anims, _) = load(
        LoadConfig::strict(),
        "<ANIMS>\n[A]\nSTATES(SPAWN) = X:AB:1:NORMAL;\n\
         [++A]\nSTATES(DEATH) = X:C:1:NORMAL:#SPAWN;\n",
    );
    result.unwrap();
    let group = anims.group("A");
    assert_eq!(group.ranges().len(), 2);
    let spawn = group.find_label("SPAWN").unwrap();
    let death = anims.arena.get(group.find_label("DEATH").unwrap()).unwrap();
    assert_eq!(death.next_state(), spawn);
    let spawn_second = anims.arena.get(StateIndex::new(spawn.get() + 1)).unwrap();
    assert_eq!(spawn_second.next_state(), spawn);
}
