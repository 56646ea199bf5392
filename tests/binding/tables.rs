//! Integration tests for FieldTable

use ddf_binding::{FieldTable, FlagDef};
use ddf_foundation::{Diagnostics, Error, ErrorKind, LoadConfig};
use pretty_assertions::assert_eq;

#[derive(Debug, Default, Clone, PartialEq)]
struct Ammo {
    kind: String,
    per_shot: i32,
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Weapon {
    name: String,
    priority: i32,
    kick: f32,
    autofire: bool,
    refire: i32,
    flags: u32,
    ammo: Ammo,
}

const WEAPON_FLAGS: &[FlagDef] = &[FlagDef::new("SILENT", 1), FlagDef::new("ZOOM", 2)];

fn table() -> FieldTable<Weapon> {
    let ammo = FieldTable::new()
        .string("TYPE", |a: &mut Ammo| &mut a.kind)
        .numeric("PER_SHOT", |a: &mut Ammo| &mut a.per_shot);
    FieldTable::new()
        .string("NAME", |w: &mut Weapon| &mut w.name)
        .numeric("PRIORITY", |w: &mut Weapon| &mut w.priority)
        .float("KICK", |w: &mut Weapon| &mut w.kick)
        .boolean("AUTOMATIC", |w: &mut Weapon| &mut w.autofire)
        .time("REFIRE", |w: &mut Weapon| &mut w.refire)
        .flags("SPECIAL", |w: &mut Weapon| &mut w.flags, WEAPON_FLAGS)
        .sub_table("AMMO", |w: &mut Weapon| &mut w.ammo, ammo)
        .field("PRIORITY_BOOST", |w: &mut Weapon, v, _| {
            w.priority += v.trim().parse::<i32>().map_err(|_| Error::not_numeric(v))?;
            Ok(())
        })
}

fn bind_all(fields: &[(&str, &str)]) -> Weapon {
    let table = table();
    let mut diag = Diagnostics::new(LoadConfig::strict());
    let mut weapon = Weapon::default();
    for (field, value) in fields {
        assert!(table.bind(&mut weapon, field, value, &mut diag).unwrap(), "{field}");
    }
    weapon
}

#[test]
fn binds_every_kind() {
    let weapon = bind_all(&[
        ("name", "Plasma Rifle"),
        ("PRIORITY", "6"),
        ("KICK", "0.5"),
        ("AUTOMATIC", "TRUE"),
        ("REFIRE", "3T"),
        ("SPECIAL", "SILENT"),
        ("SPECIAL", "ZOOM"),
        ("AMMO.TYPE", "CELLS"),
        ("ammo.per shot", "1"),
        ("PRIORITY_BOOST", "2"),
    ]);
    assert_eq!(
        weapon,
        Weapon {
            name: "Plasma Rifle".into(),
            priority: 8,
            kick: 0.5,
            autofire: true,
            refire: 3,
            flags: 3,
            ammo: Ammo {
                kind: "CELLS".into(),
                per_shot: 1,
            },
        }
    );
}

#[test]
fn binding_is_idempotent() {
    let once = bind_all(&[("KICK", "2"), ("AMMO.PER_SHOT", "5")]);
    let twice = bind_all(&[("KICK", "2"), ("AMMO.PER_SHOT", "5"), ("KICK", "2"), ("AMMO.PER_SHOT", "5")]);
    assert_eq!(once, twice);
}

#[test]
fn unmatched_names_leave_the_record_alone() {
    let table = table();
    let mut diag = Diagnostics::new(LoadConfig::strict());
    let mut weapon = Weapon::default();
    assert!(!table.bind(&mut weapon, "ZOOM_FACTOR", "2", &mut diag).unwrap());
    assert!(!table.bind(&mut weapon, "AMMO.CLIP", "2", &mut diag).unwrap());
    assert!(!table.bind(&mut weapon, "AMMO.", "2", &mut diag).unwrap());
    assert_eq!(weapon, Weapon::default());
}

#[test]
fn parser_errors_propagate() {
    let table = table();
    let mut diag = Diagnostics::new(LoadConfig::lax());
    let mut weapon = Weapon::default();
    let err = table
        .bind(&mut weapon, "PRIORITY", "high", &mut diag)
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NotNumeric(_)));
}

#[test]
fn names_include_sub_tables() {
    let names = table().names();
    assert!(names.contains(&"AMMO.PER_SHOT".to_string()));
    assert!(names.contains(&"SPECIAL".to_string()));
    assert_eq!(names.len(), 9);
}
