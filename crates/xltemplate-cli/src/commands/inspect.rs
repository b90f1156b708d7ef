use crate::cli::InspectArgs;
use anyhow::{Context, Result, anyhow};
use xltemplate::{Placeholder, classify_value, placeholder::is_row_number};
use xltemplate_common::CellRef;
use xltemplate_workbook::{Grid, open_workbook};

pub fn run(args: InspectArgs) -> Result<()> {
    let mut book = open_workbook(&args.template)
        .with_context(|| format!("opening {}", args.template.display()))?;
    let names = book.sheet_names();
    let grid = args
        .sheet
        .checked_sub(1)
        .and_then(|index| book.sheet_mut(index))
        .ok_or_else(|| {
            anyhow!(
                "sheet {} does not exist (template has {} sheets)",
                args.sheet,
                names.len()
            )
        })?;

    println!("sheet {}: {}", args.sheet, names[args.sheet - 1]);
    let (mut scalars, mut loops) = (0usize, 0usize);
    for row in 1..=grid.highest_row() {
        for col in grid.existing_columns(row) {
            let cell = CellRef::new(row, col);
            match classify_value(&grid.cell_value(row, col)) {
                Placeholder::LoopStart(key) => {
                    loops += 1;
                    println!("{cell}\tloop\t{key}");
                }
                Placeholder::ScalarRef(key) if is_row_number(&key) => {
                    scalars += 1;
                    println!("{cell}\trow-number\t{key}");
                }
                Placeholder::ScalarRef(key) => {
                    scalars += 1;
                    println!("{cell}\tscalar\t{key}");
                }
                Placeholder::Literal(_) => {}
            }
        }
    }
    println!("{scalars} placeholders, {loops} loops");
    Ok(())
}
