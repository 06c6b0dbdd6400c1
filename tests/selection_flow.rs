//! End-to-end checks of the selection engine: CSV in, ordered hosts out.

use mssh::layout::TermSize;
use mssh::menu::{Menu, Outcome};
use mssh::prefs::Preferences;
use mssh::selection::{RangeCheck, parse_selection};
use mssh::{Context, Inventory, NO_TAG, TagIndex};
use std::io::Cursor;
use std::path::Path;

const FLEET: &str = "host,tag1,tag2\nweb1,prod,east\nweb2,prod,west\ndb1,prod\n";

fn terminal() -> TermSize {
    TermSize {
        width: 80,
        height: 24,
    }
}

fn write_inventory(dir: &Path, contents: &str) -> Context {
    let csv = dir.join("servers.csv");
    std::fs::write(&csv, contents).unwrap();
    Context {
        inventory_key: std::fs::canonicalize(&csv).unwrap().to_string_lossy().into_owned(),
        inventory: csv,
        prefs_file: dir.join("state").join("mssh.json"),
        ..Context::default()
    }
}

/// One interactive run: load, show the menu, answer, resolve.
fn session(ctx: &Context, typed: &str) -> (Vec<String>, String) {
    let inventory = Inventory::load(&ctx.inventory).unwrap();
    let index = TagIndex::build(&inventory);
    let mut prefs = Preferences::open(&ctx.prefs_file).unwrap();

    let menu = Menu::new(ctx, index.tags()).with_term_size(terminal);
    let mut out = Vec::new();
    let outcome = menu
        .run(&mut prefs, &mut Cursor::new(typed.as_bytes().to_vec()), &mut out)
        .unwrap();

    let selection = match outcome {
        Outcome::Accept(selection) => selection,
        Outcome::Quit => panic!("unexpected quit"),
    };
    let hosts = index.resolve(&inventory, &selection).unwrap();
    (hosts, String::from_utf8(out).unwrap())
}

#[test]
fn tag_selection_resolves_in_csv_order() {
    let inventory = Inventory::from_reader(FLEET.as_bytes()).unwrap();
    let index = TagIndex::build(&inventory);
    assert_eq!(index.tags(), &["east", "prod", "west"]);

    let selection = parse_selection("2", index.len(), RangeCheck::Lenient).unwrap();
    let hosts = index.resolve(&inventory, &selection).unwrap();
    assert_eq!(hosts, vec!["web1", "web2", "db1"]);
}

#[test]
fn overlapping_tags_yield_each_host_once() {
    let inventory = Inventory::from_reader(FLEET.as_bytes()).unwrap();
    let index = TagIndex::build(&inventory);
    let selection = parse_selection("3,1-2,2", index.len(), RangeCheck::Lenient).unwrap();
    let hosts = index.resolve(&inventory, &selection).unwrap();
    assert_eq!(hosts, vec!["web1", "web2", "db1"]);
}

#[test]
fn untagged_hosts_are_selectable() {
    let csv = "host,a,b\nweb1,prod\nlegacy1, , \nlegacy2\n";
    let inventory = Inventory::from_reader(csv.as_bytes()).unwrap();
    let index = TagIndex::build(&inventory);
    assert_eq!(index.tags(), &[NO_TAG, "prod"]);

    let selection = parse_selection("1", index.len(), RangeCheck::Lenient).unwrap();
    assert_eq!(
        index.resolve(&inventory, &selection).unwrap(),
        vec!["legacy1", "legacy2"]
    );
}

#[test]
fn lenient_range_past_the_menu_fails_at_resolution() {
    let inventory = Inventory::from_reader(FLEET.as_bytes()).unwrap();
    let index = TagIndex::build(&inventory);

    let selection = parse_selection("2-4", index.len(), RangeCheck::Lenient).unwrap();
    assert!(index.resolve(&inventory, &selection).is_err());
    assert!(parse_selection("2-4", index.len(), RangeCheck::Strict).is_err());
}

#[test]
fn remembered_selection_is_offered_next_run() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = write_inventory(dir.path(), FLEET);

    let (first, _) = session(&ctx, "1, 3\n");
    assert_eq!(first, vec!["web1", "web2"]);

    let (second, out) = session(&ctx, "\n");
    assert!(out.contains("(default=1,3)"));
    assert_eq!(second, first);
}

#[test]
fn preferences_are_kept_per_inventory() {
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();
    let ctx_a = write_inventory(dir_a.path(), FLEET);
    let mut ctx_b = write_inventory(dir_b.path(), FLEET);
    ctx_b.prefs_file = ctx_a.prefs_file.clone();

    session(&ctx_a, "2\n");
    session(&ctx_b, "3\n");

    let prefs = Preferences::open(&ctx_a.prefs_file).unwrap();
    assert_eq!(prefs.get(&ctx_a.inventory_key).last_selection, "2");
    assert_eq!(prefs.get(&ctx_b.inventory_key).last_selection, "3");
}

#[test]
fn retry_after_bad_input_then_accept() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = write_inventory(dir.path(), FLEET);

    let (hosts, out) = session(&ctx, "\nfoo\n4\n3\n");
    assert_eq!(hosts, vec!["web2"]);
    assert!(out.contains("No selection made. Try again"));
    assert!(out.contains("Invalid input: `foo`"));
    assert!(out.contains("Invalid input: `4`"));
    assert!(out.contains("Selected: `3. west`"));
}
