//! Suite-level defaults and their scoped, self-reverting variant.

use std::panic::{catch_unwind, AssertUnwindSafe};

use gilded::helper::TestSpy;
use gilded::{Golden, MemFs, Options};

fn set_up() -> (MemFs, Golden<MemFs>) {
    let fs = MemFs::new();
    let gld = Golden::using_fs(fs.clone());
    (fs, gld)
}

#[test]
fn default_folder_applies_to_all_later_calls() {
    let (fs, gld) = set_up();
    gld.set_defaults(Options::new().folder("testdata"));

    let mut spy = TestSpy::new("TestDefaults/folder");
    gld.verify_with(&mut spy, "first subject.", Options::new().snapshot("example-1"));
    gld.verify_with(&mut spy, "second subject.", Options::new().snapshot("example-2"));

    fs.assert_snapshot_was_created("testdata/example-1.snap");
    fs.assert_snapshot_was_created("testdata/example-2.snap");
}

#[test]
fn default_extension_applies_to_all_later_calls() {
    let (fs, gld) = set_up();
    gld.set_defaults(Options::new().extension(".snapshot"));

    let mut spy = TestSpy::new("TestDefaults/extension");
    gld.verify_with(&mut spy, "first subject.", Options::new().snapshot("example-1"));
    gld.verify_with(&mut spy, "second subject.", Options::new().snapshot("example-2"));

    fs.assert_snapshot_was_created("__snapshots/example-1.snapshot");
    fs.assert_snapshot_was_created("__snapshots/example-2.snapshot");
}

#[test]
fn default_snapshot_name_is_not_allowed() {
    let (fs, gld) = set_up();
    gld.set_defaults(Options::new().snapshot("example"));

    let mut spy = TestSpy::new("TestDefaults/should_not_allow_default_name");
    gld.verify(&mut spy, "example subject.");

    fs.assert_snapshot_was_created("__snapshots/TestDefaults/should_not_allow_default_name.snap");
}

#[test]
fn default_approval_is_not_allowed() {
    let (_fs, gld) = set_up();
    gld.set_defaults(Options::new().wait_approval());

    let mut spy = TestSpy::new("TestDefaults/approval_is_call_scoped");
    gld.verify(&mut spy, "subject.");
    gld.verify(&mut spy, "subject.");

    // Approval never sticks at suite level, so both calls verify normally.
    spy.assert_passed();
}

#[test]
fn per_call_options_still_override_defaults() {
    let (fs, gld) = set_up();
    gld.set_defaults(Options::new().folder("testdata"));

    let mut spy = TestSpy::new("TestDefaults/override");
    gld.verify_with(
        &mut spy,
        "subject.",
        Options::new().folder("elsewhere").snapshot("example"),
    );

    fs.assert_snapshot_was_created("elsewhere/example.snap");
}

#[test]
fn scoped_defaults_revert_on_drop() {
    let (fs, gld) = set_up();
    let mut spy = TestSpy::new("TestDefaults/scoped");

    {
        let _scope = gld.scoped_defaults(Options::new().folder("scoped_folder"));
        gld.verify_with(&mut spy, "inside.", Options::new().snapshot("inside"));
    }
    gld.verify_with(&mut spy, "outside.", Options::new().snapshot("outside"));

    fs.assert_snapshot_was_created("scoped_folder/inside.snap");
    fs.assert_snapshot_was_created("__snapshots/outside.snap");
}

#[test]
fn scoped_defaults_revert_even_on_panic() {
    let (fs, gld) = set_up();

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let _scope = gld.scoped_defaults(Options::new().folder("scoped_folder"));
        panic!("test body blew up");
    }));
    assert!(outcome.is_err());

    let mut spy = TestSpy::new("TestDefaults/after_panic");
    gld.verify_with(&mut spy, "subject.", Options::new().snapshot("after-panic"));
    fs.assert_snapshot_was_created("__snapshots/after-panic.snap");
}

#[test]
fn nested_scopes_unwind_in_order() {
    let (fs, gld) = set_up();
    let mut spy = TestSpy::new("TestDefaults/nested");

    let outer = gld.scoped_defaults(Options::new().folder("outer"));
    {
        let _inner = gld.scoped_defaults(Options::new().extension(".inner"));
        gld.verify_with(&mut spy, "subject.", Options::new().snapshot("deep"));
    }
    gld.verify_with(&mut spy, "subject.", Options::new().snapshot("middle"));
    drop(outer);
    gld.verify_with(&mut spy, "subject.", Options::new().snapshot("top"));

    fs.assert_snapshot_was_created("outer/deep.inner");
    fs.assert_snapshot_was_created("outer/middle.snap");
    fs.assert_snapshot_was_created("__snapshots/top.snap");
}
