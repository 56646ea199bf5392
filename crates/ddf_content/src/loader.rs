//! Load orchestration.
//!
//! Domains are loaded in dependency order, each file through its own
//! reader, then cross-domain names are resolved once every domain they can
//! point into has finished.
//!
//! # Example
//!
//! ```
//! use ddf_content::{Loader, MemorySource};
//! use ddf_foundation::LoadConfig;
//!
//! let source = MemorySource::new()
//!     .with_file("things.ddf", "<THINGS> [BALL] STATES(SPAWN) = BAL1:AB:4:BRIGHT;")
//!     .with_file("attacks.ddf", "<ATTACKS> [FIRE] ATTACKTYPE = PROJECTILE; SPAWNED_OBJECT = BALL;");
//!
//! let mut loader = Loader::new(LoadConfig::strict());
//! let report = loader.load_all(&source).unwrap();
//! assert_eq!(report.files, 2);
//! assert_eq!(loader.attacks().lookup("FIRE").unwrap().spawned, Some(0));
//! ```

use ddf_binding::FieldTable;
use ddf_foundation::{LoadConfig, Result, Warning};
use ddf_language::{FileSummary, Session};
use ddf_states::StateArena;
use ddf_storage::{DefinitionContainer, NumericContainer, PendingRefs};

use crate::attacks::{
    AttackDefinition, AttackReader, AttackRefKey, apply_attack_refs, attack_fields,
};
use crate::lines::{LineReader, LineType, line_fields};
use crate::source::TextSource;
use crate::things::{ThingDefinition, ThingReader, thing_fields};

/// A content domain the loader knows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Domain {
    /// `<THINGS>`
    Things,
    /// `<ATTACKS>`
    Attacks,
    /// `<LINES>`
    Lines,
}

impl Domain {
    /// Dependency order: things before the attacks that name them.
    pub const LOAD_ORDER: [Domain; 3] = [Self::Things, Self::Attacks, Self::Lines];

    /// The tag files of this domain start with.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Things => "THINGS",
            Self::Attacks => "ATTACKS",
            Self::Lines => "LINES",
        }
    }

    /// The file [`Loader::load_all`] reads for this domain.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Things => "things.ddf",
            Self::Attacks => "attacks.ddf",
            Self::Lines => "lines.ddf",
        }
    }
}

/// Totals for a completed load.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Files parsed.
    pub files: usize,
    /// Entries completed across all files.
    pub entries: usize,
    /// Warnings collected (lax downgrades and plain warnings).
    pub warnings: Vec<Warning>,
}

/// Owns everything a DDF load produces.
#[derive(Debug)]
pub struct Loader {
    session: Session,
    arena: StateArena,
    things: DefinitionContainer<ThingDefinition>,
    attacks: DefinitionContainer<AttackDefinition>,
    lines: NumericContainer<LineType>,
    attack_refs: PendingRefs<AttackRefKey>,
    thing_fields: FieldTable<ThingDefinition>,
    attack_fields: FieldTable<AttackDefinition>,
    line_fields: FieldTable<LineType>,
    entries: usize,
}

impl Loader {
    /// Creates an empty loader.
    #[must_use]
    pub fn new(config: LoadConfig) -> Self {
        Self {
            session: Session::new(config),
            arena: StateArena::new(),
            things: DefinitionContainer::new(),
            attacks: DefinitionContainer::new(),
            lines: NumericContainer::new(),
            attack_refs: PendingRefs::new(),
            thing_fields: thing_fields(),
            attack_fields: attack_fields(),
            line_fields: line_fields(),
            entries: 0,
        }
    }

    /// Parses one file of `domain`.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error of the file.
    pub fn parse(&mut self, domain: Domain, file: &str, text: &str) -> Result<FileSummary> {
        let summary = match domain {
            Domain::Things => {
                let mut reader =
                    ThingReader::new(&mut self.things, &mut self.arena, &self.thing_fields);
                self.session.parse_file(&mut reader, file, text)?
            }
            Domain::Attacks => {
                let mut reader = AttackReader::new(
                    &mut self.attacks,
                    &mut self.attack_refs,
                    &self.attack_fields,
                );
                self.session.parse_file(&mut reader, file, text)?
            }
            Domain::Lines => {
                let mut reader = LineReader::new(&mut self.lines, &self.line_fields);
                self.session.parse_file(&mut reader, file, text)?
            }
        };
        self.entries += summary.entries;
        Ok(summary)
    }

    /// Loads every domain's file from `source` in [`Domain::LOAD_ORDER`],
    /// then [`finish`](Self::finish)es the load.
    ///
    /// A domain whose file is missing is skipped.
    ///
    /// # Errors
    ///
    /// Read failures, the first fatal parse error, or an unresolved
    /// cross-domain reference.
    pub fn load_all(&mut self, source: &dyn TextSource) -> Result<LoadReport> {
        for domain in Domain::LOAD_ORDER {
            let file = domain.file_name();
            match source.read(file)? {
                Some(text) => {
                    self.parse(domain, file, &text)?;
                }
                None => log::debug!("no {file}, skipping <{}>", domain.tag()),
            }
        }
        self.finish()
    }

    /// Resolves cross-domain references and ends the load.
    ///
    /// # Errors
    ///
    /// Returns `UnresolvedReference` for the first name that matches no
    /// definition. The references stay pending, so a later `finish` fails
    /// the same way until the name is defined.
    pub fn finish(&mut self) -> Result<LoadReport> {
        let resolved = self
            .attack_refs
            .resolve_all(|name, _| self.things.index_of(name))?;
        apply_attack_refs(&mut self.attacks, resolved);
        self.attack_refs.clear();

        let warnings = self.session.end_load();
        Ok(LoadReport {
            files: self.session.files_parsed(),
            entries: self.entries,
            warnings,
        })
    }

    /// The session (configuration and diagnostics).
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Every state built so far.
    #[must_use]
    pub fn arena(&self) -> &StateArena {
        &self.arena
    }

    /// Loaded things.
    #[must_use]
    pub fn things(&self) -> &DefinitionContainer<ThingDefinition> {
        &self.things
    }

    /// Loaded attacks.
    #[must_use]
    pub fn attacks(&self) -> &DefinitionContainer<AttackDefinition> {
        &self.attacks
    }

    /// Loaded line types.
    #[must_use]
    pub fn lines(&self) -> &NumericContainer<LineType> {
        &self.lines
    }

    /// Number of attack references still waiting for [`finish`](Self::finish).
    #[must_use]
    pub fn pending_references(&self) -> usize {
        self.attack_refs.len()
    }
}
