//! Example: Read a BCSV file, print its columns and export to JSON and CSV

use std::env;
use std::path::Path;

use bcsv_parse::{from_file, to_csv, to_json, HashDictionary, IoOptions};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let bcsv_path = env::args()
        .nth(1)
        .unwrap_or_else(|| "assets/examples/ItemParam.bcsv".to_string());
    let bcsv_path = Path::new(&bcsv_path);

    let dict = HashDictionary::bundled();
    let table = from_file(&dict, bcsv_path, &IoOptions::default())?;

    println!("BCSV Info");
    println!("Entries: {}", table.len());
    println!("Fields: {}", table.num_fields());
    println!();

    println!("Fields");
    for field in table.fields() {
        println!("+0x{:X} - {}", field.offset, dict.field_name(field.hash));
    }
    println!();

    if let Some(first) = table.get_entry(0) {
        println!("First entry");
        for (name, value) in first.iter() {
            println!("{} ({}) = {}", name, value.cell_type(), value);
        }
    }

    to_json(&table, "test_output.json")?;
    to_csv(&table, "test_output.csv", false)?;
    println!("\nExported to test_output.json and test_output.csv");

    Ok(())
}
