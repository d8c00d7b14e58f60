/// recordview walkthrough
///
/// Loads the sample records, then:
/// - searches by name, with a typo
/// - narrows by price and date
/// - sorts, groups and pages through the result

use recordview::query::filter::DateRange;
use recordview::{Config, Field, RecordStore, SortOrder, ViewController};
use std::fs::File;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("\n╔═══════════════════════════════════════════════╗");
    println!("║        recordview - Simple Usage Demo         ║");
    println!("╚═══════════════════════════════════════════════╝\n");

    // Step 1: Load records
    println!("Step 1: Loading records...");
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/sample-data.json");
    let store = RecordStore::from_reader(File::open(path)?)?;
    println!("  Loaded {} records\n", store.len());

    let mut view = ViewController::new(store, Config::default());
    print_page(&view, "Default view (price 0-100, since 2020, by name)");

    // Step 2: Search
    println!("Step 2: SEARCH");
    view.set_search_term("lamp");
    print_page(&view, "'lamp'");
    view.set_search_term("keybaord");
    print_page(&view, "'keybaord' (typo)");
    view.set_search_term("");
    view.reset_page();

    // Step 3: Filters and sort
    println!("Step 3: FILTER + SORT");
    view.set_price_range(0.0, 500.0);
    view.set_date_range(DateRange::parse("2022-01-01", "2023-12-31")?);
    view.set_sort("price", SortOrder::Desc);
    print_page(&view, "2022-2023, price descending");

    // Step 4: Grouping and paging
    println!("Step 4: GROUP + PAGE");
    view.set_group_keys([Field::Category]);
    view.set_page_size(10)?;
    loop {
        let derived = view.query();
        println!("  Page {}/{}", derived.page_index() + 1, derived.page_count());
        for group in derived.rows.groups().unwrap_or_default() {
            let names: Vec<&str> = group.rows.iter().map(|r| r.name.as_str()).collect();
            println!("    [{}] {}", group.key.label(), names.join(", "));
        }
        if !derived.can_next() {
            break;
        }
        view.next_page();
    }

    // Step 5: Invalid page size
    match view.set_page_size(7) {
        Ok(_) => println!("\n  Page size 7 accepted"),
        Err(e) => println!("\n  Page size 7 rejected: {}", e),
    }

    println!("\nDone!");
    Ok(())
}

fn print_page(view: &ViewController, title: &str) {
    let derived = view.query();
    println!(
        "  {}: {} matches, page {}/{}",
        title,
        derived.total(),
        derived.page_index() + 1,
        derived.page_count().max(1)
    );
    for record in derived.page_rows() {
        println!("    #{:<3} {:<28} {:>8.2}", record.id.0, record.name, record.price);
    }
    println!();
}
