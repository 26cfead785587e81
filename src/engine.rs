//! The Verify engine.
//!
//! [`Golden`] orchestrates one snapshot verification per call: it resolves
//! the effective configuration, normalizes and scrubs the subject, computes
//! the snapshot path, and either compares against the stored snapshot
//! (verify mode) or regenerates it and forces a failure (approval mode).
//! Failures are routed through the host test runner's [`Failable`]
//! capability; storage and serialization faults are fatal and panic, since
//! they indicate environment or usage defects rather than test outcomes.
//!
//! An engine is an explicit, constructible value. There is no process-wide
//! singleton: tests that want a shared instance build one in their own
//! bootstrap and pass it around.

use std::fmt::Display;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;

use serde::Serialize;

use crate::combinatory;
use crate::config::{Config, Options, MASTER_EXTENSION};
use crate::normalize::normalize;
use crate::report::{DiffReporter, LineDiffReporter};
use crate::vfs::{OsFs, Vfs};

const VERIFY_HEADER: &str = "Subject does not match the snapshot:";
const APPROVAL_HEADER: &str =
    "Approval pending: the snapshot was updated; review it and switch the test back to verify.";

/// The capability the host test runner exposes to the engine.
///
/// `errorf` records a failure for the current test; `helper` is cosmetic
/// and safe to leave as the no-op default; `name` identifies the current
/// test and doubles as the default snapshot name.
pub trait Failable {
    fn errorf(&mut self, report: &str);
    fn helper(&self) {}
    fn name(&self) -> String;
}

/// [`Failable`] adapter for plain Rust `#[test]` functions: takes the test
/// identity from the current thread's name and panics on failure.
#[derive(Clone, Copy, Default)]
pub struct CurrentTest;

impl Failable for CurrentTest {
    fn errorf(&mut self, report: &str) {
        panic!("{report}");
    }

    fn name(&self) -> String {
        // The libtest harness names each test thread after the test path.
        thread::current()
            .name()
            .unwrap_or("unnamed_test")
            .replace("::", "/")
    }
}

/// A snapshot-verification engine bound to one storage adapter.
///
/// The engine is safe to share between concurrently running tests: every
/// invocation runs as a critical section, so configuration resolution and
/// the snapshot read/write pair of one call never interleave with another.
pub struct Golden<F: Vfs = OsFs> {
    fs: F,
    reporter: Box<dyn DiffReporter>,
    base: Mutex<Config>,
}

impl Golden<OsFs> {
    /// An engine over the real filesystem with the default folder
    /// (`__snapshots`) and extension (`.snap`).
    pub fn new() -> Self {
        Golden::using_fs(OsFs)
    }
}

impl Default for Golden<OsFs> {
    fn default() -> Self {
        Golden::new()
    }
}

impl<F: Vfs> Golden<F> {
    /// An engine over the given storage adapter. Tests of code using the
    /// engine itself usually pass a [`crate::MemFs`] handle here.
    pub fn using_fs(fs: F) -> Self {
        Golden {
            fs,
            reporter: Box::new(LineDiffReporter),
            base: Mutex::new(Config::default()),
        }
    }

    /// Replaces the diff strategy used in failure reports.
    pub fn with_reporter<R: DiffReporter + 'static>(mut self, reporter: R) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    /// Verifies `subject` against its snapshot under the current defaults.
    pub fn verify<S: Serialize + ?Sized>(&self, t: &mut dyn Failable, subject: &S) {
        self.verify_with(t, subject, Options::new());
    }

    /// Verifies `subject` against its snapshot, with per-call options.
    ///
    /// On the first run the snapshot is created and the test passes. On
    /// later runs the stored snapshot is the criteria: a mismatch fails
    /// the test with a diff report, and the stored content is left
    /// untouched. With [`Options::wait_approval`] the snapshot is instead
    /// rewritten unconditionally and the test always fails, forcing a
    /// human review before switching back.
    pub fn verify_with<S: Serialize + ?Sized>(
        &self,
        t: &mut dyn Failable,
        subject: &S,
        options: Options,
    ) {
        t.helper();

        // One invocation at a time per engine: two concurrent calls must
        // not interleave configuration resolution or race on the same
        // path's read/write pair. Held until the failure signal is issued.
        let base = self.lock_base();
        let conf = base.merge(&options);
        let path = conf.snapshot_path(&t.name());

        let normalized = match normalize(subject) {
            Ok(text) => text,
            Err(err) => panic!("could not normalize subject for {path}: {err}"),
        };
        let subject_text = conf
            .scrubbers
            .iter()
            .fold(normalized, |text, scrubber| scrubber.clean(&text));

        if conf.approval_mode() {
            self.approve(t, &path, &subject_text);
        } else {
            self.check(t, &path, &subject_text);
        }
        drop(base);
    }

    /// Golden-master verification: runs `wrapper` against every
    /// combination of `params` and snapshots the aggregated records.
    ///
    /// Combinations are generated with the first parameter varying
    /// fastest, records carry sequential 1-based ids, and the snapshot
    /// takes the `.snap.json` extension unless overridden per call.
    pub fn master<T, O, W>(&self, t: &mut dyn Failable, wrapper: W, params: &[Vec<T>])
    where
        T: Display + Clone,
        O: Serialize,
        W: FnMut(&[T]) -> O,
    {
        self.master_with(t, wrapper, params, Options::new());
    }

    /// Golden-master verification with per-call options.
    pub fn master_with<T, O, W>(
        &self,
        t: &mut dyn Failable,
        wrapper: W,
        params: &[Vec<T>],
        options: Options,
    ) where
        T: Display + Clone,
        O: Serialize,
        W: FnMut(&[T]) -> O,
    {
        t.helper();
        let records = combinatory::run(wrapper, params);
        let effective = Options::new().extension(MASTER_EXTENSION).overlay(&options);
        self.verify_with(t, &records, effective);
    }

    /// Merges `options` into the engine's defaults for every later call.
    ///
    /// Snapshot names and the approval flag are always per call and are
    /// ignored here: a suite-wide name would make every test share one
    /// file, and a suite-wide approval would keep a whole suite red with
    /// no visible cause at the call sites.
    pub fn set_defaults(&self, options: Options) {
        let mut base = self.lock_base();
        *base = base.merge(&suite_scoped(options));
    }

    /// Like [`Golden::set_defaults`], but scoped: the returned guard
    /// restores the previous defaults when dropped, whether the enclosed
    /// test succeeded or panicked.
    pub fn scoped_defaults(&self, options: Options) -> DefaultsGuard<'_, F> {
        let mut base = self.lock_base();
        let previous = base.clone();
        *base = base.merge(&suite_scoped(options));
        drop(base);
        DefaultsGuard {
            golden: self,
            previous: Some(previous),
        }
    }

    fn approve(&self, t: &mut dyn Failable, path: &str, subject: &str) {
        let previous = match self.fs.read_file(path) {
            Ok(bytes) => snapshot_text(path, bytes),
            Err(err) if err.is_not_found() => String::new(),
            Err(err) => panic!("could not read snapshot {path}: {err}"),
        };

        if let Err(err) = self.fs.write_file(path, subject.as_bytes()) {
            panic!("could not write snapshot {path}: {err}");
        }

        let diff = self.reporter.differences(&previous, subject);
        t.errorf(&format!("{APPROVAL_HEADER}\n{diff}"));
    }

    fn check(&self, t: &mut dyn Failable, path: &str, subject: &str) {
        let exists = match self.fs.exists(path) {
            Ok(exists) => exists,
            Err(err) => panic!("could not check snapshot {path}: {err}"),
        };

        // First-run bootstrap: the subject becomes the snapshot and the
        // test passes.
        if !exists {
            if let Err(err) = self.fs.write_file(path, subject.as_bytes()) {
                panic!("could not create snapshot {path}: {err}");
            }
        }

        let snapshot = match self.fs.read_file(path) {
            Ok(bytes) => snapshot_text(path, bytes),
            Err(err) => panic!("could not read snapshot {path}: {err}"),
        };

        if snapshot != subject {
            let diff = self.reporter.differences(&snapshot, subject);
            t.errorf(&format!("{VERIFY_HEADER}\n{diff}"));
        }
    }

    // A failure report that panics (the usual Rust test outcome) poisons
    // the mutex on unwind; recovering here keeps one failing test from
    // wedging every later test sharing this engine.
    fn lock_base(&self) -> MutexGuard<'_, Config> {
        self.base.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Restores the engine's previous defaults on drop. Returned by
/// [`Golden::scoped_defaults`].
#[must_use = "dropping the guard immediately reverts the defaults"]
pub struct DefaultsGuard<'a, F: Vfs> {
    golden: &'a Golden<F>,
    previous: Option<Config>,
}

impl<F: Vfs> Drop for DefaultsGuard<'_, F> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            *self.golden.lock_base() = previous;
        }
    }
}

fn suite_scoped(mut options: Options) -> Options {
    options.name = None;
    options.approve = false;
    options
}

fn snapshot_text(path: &str, bytes: Vec<u8>) -> String {
    String::from_utf8(bytes)
        .unwrap_or_else(|err| panic!("snapshot {path} is not valid UTF-8: {err}"))
}
