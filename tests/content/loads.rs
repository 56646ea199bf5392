//! Whole-load tests for things, attacks, and lines.

use ddf_content::{
    AttackStyle, DirectorySource, Domain, Loader, MemorySource, things::MF_NOGRAVITY,
    things::MF_SHOOTABLE,
};
use ddf_foundation::{ErrorKind, LoadConfig};
use pretty_assertions::assert_eq;

const THINGS: &str = r#"<THINGS>
#DEFINE IMP_HP 60

[IMP:3001]
SPAWNHEALTH = IMP_HP;
RADIUS = 20;
HEIGHT = 56;
SPECIAL = SHOOTABLE, SOLID, COUNT_AS_KILL;
TRANSLUCENCY = 100%;
STATES(SPAWN) = TROO:AB:10:NORMAL:LOOK;
STATES(CHASE) = TROO:AABBCCDD:3:NORMAL:CHASE;
STATES(DEATH) = TROO:I:8:NORMAL, TROO:J:8:NORMAL:MAKEDEAD, TROO:M:-1:NORMAL;

{ Fireballs float }
[IMP_FIREBALL]
SPEED = 10;
SPECIAL = NOGRAVITY, MISSILE, NOBLOCKMAP;
DAMAGE.VAL = 3;
DAMAGE.MAX = 24;
STATES(SPAWN) = BAL1:AB:4:BRIGHT;
STATES(DEATH) = BAL1:CDE:6:BRIGHT, #REMOVE;
"#;

const ATTACKS: &str = "<ATTACKS>
[IMP_MISSILE]
ATTACKTYPE = PROJECTILE;
SPAWNED_OBJECT = IMP_FIREBALL;
HEIGHT = 32;

[IMP_CLAW]
ATTACKTYPE = CLOSECOMBAT;
DAMAGE.VAL = 3;
DAMAGE.OBITUARY_CHANCE = 50%;
";

const LINES: &str = "<LINES>
[1] COUNT = -1; SPECIAL = REPEATABLE; ACTIVATORS = A;
[0x10] COLOUR = NONE; DELAY = 1;
";

fn quiet(config: LoadConfig) -> Loader {
    Loader::new(config.with_log_warnings(false))
}

fn full_source() -> MemorySource {
    MemorySource::new()
        .with_file("things.ddf", THINGS)
        .with_file("attacks.ddf", ATTACKS)
        .with_file("lines.ddf", LINES)
}

// =============================================================================
// Full Loads
// =============================================================================

#[test]
fn loads_every_domain() {
    let mut loader = quiet(LoadConfig::strict());
    let report = loader.load_all(&full_source()).unwrap();

    assert_eq!(report.files, 3);
    assert_eq!(report.entries, 6);
    assert!(report.warnings.is_empty());

    let imp = loader.things().lookup("imp").unwrap();
    assert_eq!(imp.number, 3001);
    assert_eq!(imp.spawn_health, 60.0);
    assert!(imp.has_flag(MF_SHOOTABLE));
    assert_eq!(imp.translucency, 1.0);
    assert_eq!(imp.idle_state, imp.spawn_state);

    let ball = loader.things().lookup("IMP_FIREBALL").unwrap();
    assert!(ball.has_flag(MF_NOGRAVITY));
    assert_eq!(ball.damage.linger_max, 24.0);
    assert_eq!(loader.arena().walk(ball.death_state, 10).len(), 3);

    let missile = loader.attacks().lookup("IMP_MISSILE").unwrap();
    assert_eq!(missile.style, AttackStyle::Projectile);
    assert_eq!(missile.spawned, loader.things().index_of("IMP_FIREBALL"));
    let claw = loader.attacks().lookup("imp claw").unwrap();
    assert_eq!(claw.damage.obituary_chance, 0.5);

    assert_eq!(loader.lines().len(), 2);
    assert_eq!(loader.lines().lookup(16).unwrap().delay, 35);
}

#[test]
fn loads_from_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("things.ddf"), THINGS).unwrap();
    std::fs::write(dir.path().join("ATTACKS.DDF"), ATTACKS).unwrap();

    let mut loader = quiet(LoadConfig::strict());
    let report = loader.load_all(&DirectorySource::new(dir.path())).unwrap();
    assert_eq!(report.files, 2);
    assert!(loader.lines().is_empty());
    assert!(loader.attacks().lookup("IMP_MISSILE").unwrap().spawned.is_some());
}

#[test]
fn macros_are_file_scoped() {
    let mut loader = quiet(LoadConfig::strict());
    loader.parse(Domain::Things, "a.ddf", THINGS).unwrap();
    let err = loader
        .parse(Domain::Things, "b.ddf", "<THINGS>[X] SPAWNHEALTH = IMP_HP;")
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NotNumeric(_)));
}

// =============================================================================
// Strict and Lax
// =============================================================================

#[test]
fn lax_load_keeps_defaults_for_bad_fields() {
    let text = "<THINGS>\n[GHOST]\nSPEED = 12;\nSHIMMER = 3;\nSPECIAL = FUZZY, SPOOKY;\n\
                TRANSLUCENCY = 150%;\nSTATES(SPAWN) = GHST:A:-1:NORMAL;\n";

    let mut strict = quiet(LoadConfig::strict());
    let err = strict.parse(Domain::Things, "ghost.ddf", text).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownField("SHIMMER".into()));
    assert_eq!(err.context.unwrap().line, Some(4));

    let mut lax = quiet(LoadConfig::lax());
    lax.parse(Domain::Things, "ghost.ddf", text).unwrap();
    let report = lax.finish().unwrap();
    assert_eq!(report.warnings.len(), 3);

    let ghost = lax.things().lookup("GHOST").unwrap();
    assert_eq!(ghost.speed, 12.0);
    assert_eq!(ghost.translucency, 1.0);
    assert!(!ghost.spawn_state.is_null());
}

#[test]
fn redefinition_in_a_later_file_wins() {
    let mut loader = quiet(LoadConfig::strict());
    loader.parse(Domain::Things, "base.ddf", THINGS).unwrap();
    loader
        .parse(Domain::Things, "mod.ddf", "<THINGS>\n[IMP]\nSPAWNHEALTH = 200;\n")
        .unwrap();
    let imp = loader.things().lookup("IMP").unwrap();
    assert_eq!(imp.spawn_health, 200.0);
    assert_eq!(imp.number, -1);
    assert_eq!(loader.things().len(), 2);
}

#[test]
fn clearall_then_dangling_attack_reference() {
    let mut loader = quiet(LoadConfig::strict());
    loader.parse(Domain::Things, "base.ddf", THINGS).unwrap();
    loader.parse(Domain::Attacks, "attacks.ddf", ATTACKS).unwrap();
    loader
        .parse(Domain::Things, "mod.ddf", "<THINGS>\n#CLEARALL\n[ZOMBIE] SPEED = 8;\n")
        .unwrap();

    let err = loader.finish().unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::UnresolvedReference {
            name: "IMP_FIREBALL".into(),
            purpose: "spawned object".into(),
        }
    );
}
