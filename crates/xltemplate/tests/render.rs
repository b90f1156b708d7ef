use xltemplate::{
    AttributeRecord, FieldMap, LiteralValue, LoopDataset, MapRecord, RenderConfig, Settings,
    render_sheet,
};
use xltemplate_workbook::{Grid, MemorySheet};

fn invoice_settings() -> Settings {
    let items = LoopDataset::new(FieldMap::new().with("name", "ITEM_NAME").with("qty", "QTY"))
        .with_record(MapRecord::new().with("name", "Pen").with("qty", 3))
        .with_record(MapRecord::new().with("name", "Book").with("qty", 1));
    Settings::new()
        .with_value("TITLE", "Invoice")
        .with_loop("ITEMS", items)
}

fn invoice_template() -> MemorySheet {
    MemorySheet::from_rows(vec![
        vec!["%TITLE%", "", ""],
        vec!["%LOOP ITEMS%", "", ""],
        vec!["%ROW_NUMBER%", "%ITEM_NAME%", "%QTY%"],
        vec!["Total", "", ""],
    ])
}

fn texts(sheet: &MemorySheet) -> Vec<Vec<String>> {
    sheet.to_text_rows()
}

fn merges(sheet: &MemorySheet) -> Vec<String> {
    let mut out: Vec<String> = sheet.merged_ranges().iter().map(|r| r.to_string()).collect();
    out.sort();
    out
}

#[test]
fn invoice_scenario() {
    let mut sheet = invoice_template();
    let report = render_sheet(&mut sheet, &invoice_settings(), &RenderConfig::default());

    assert_eq!(
        texts(&sheet),
        vec![
            vec!["Invoice", "", ""],
            vec!["1", "Pen", "3"],
            vec!["2", "Book", "1"],
            vec!["Total", "", ""],
        ]
    );
    assert_eq!(sheet.cell_value(2, 1), LiteralValue::Int(1));
    assert_eq!(sheet.cell_value(3, 3), LiteralValue::Int(1));
    assert_eq!(report.loops_expanded, 1);
    assert_eq!(report.rows_inserted, 1);
    assert_eq!(report.rows_removed, 1);
    assert_eq!(report.substitutions, 7);
}

#[test]
fn literal_cells_are_unchanged() {
    let mut sheet = MemorySheet::from_rows(vec![
        vec![
            LiteralValue::from("plain"),
            LiteralValue::Number(2.5),
            LiteralValue::Boolean(true),
            LiteralValue::from("100%"),
            LiteralValue::from("%almost"),
        ],
    ]);
    let before = sheet.clone();
    let report = render_sheet(&mut sheet, &invoice_settings(), &RenderConfig::default());
    assert_eq!(sheet, before);
    assert_eq!(report.substitutions, 0);
}

#[test]
fn row_number_counts_every_record() {
    let data = LoopDataset::new(FieldMap::new()).with_records((0..5).map(|_| MapRecord::new()));
    let settings = Settings::new().with_loop("L", data);
    let mut sheet = MemorySheet::from_rows(vec![vec!["%LOOP L%"], vec!["%ROW_NUMBER%"]]);
    render_sheet(&mut sheet, &settings, &RenderConfig::default());

    let numbers: Vec<LiteralValue> = (1..=5).map(|r| sheet.cell_value(r, 1)).collect();
    assert_eq!(numbers, (1..=5).map(LiteralValue::Int).collect::<Vec<_>>());
    assert_eq!(sheet.highest_row(), 5);
}

#[test]
fn merges_replicate_into_every_record_row() {
    let mut sheet = MemorySheet::from_rows(vec![
        vec!["%TITLE%", "", "", ""],
        vec!["%LOOP ITEMS%", "", "", ""],
        vec!["%ROW_NUMBER%", "%ITEM_NAME%", "", "%QTY%"],
        vec!["Total", "", "", ""],
    ])
    .with_merge("A1:D1")
    .unwrap()
    .with_merge("B3:C3")
    .unwrap();
    render_sheet(&mut sheet, &invoice_settings(), &RenderConfig::default());

    // Template row 3 became rows 2-3 once the marker row went away.
    assert_eq!(merges(&sheet), vec!["A1:D1", "B2:C2", "B3:C3"]);
    assert_eq!(sheet.cell_value(3, 2), LiteralValue::from("Book"));
    assert_eq!(sheet.cell_value(4, 1), LiteralValue::from("Total"));
}

#[test]
fn single_record_adds_no_rows_or_merges() {
    let data = LoopDataset::new(FieldMap::new().with("name", "ITEM_NAME"))
        .with_record(MapRecord::new().with("name", "Only"));
    let settings = Settings::new().with_loop("ITEMS", data);
    let mut sheet = MemorySheet::from_rows(vec![
        vec!["%LOOP ITEMS%", "", ""],
        vec!["%ITEM_NAME%", "", "x"],
        vec!["end", "", ""],
    ])
    .with_merge("A2:B2")
    .unwrap();
    let report = render_sheet(&mut sheet, &settings, &RenderConfig::default());

    assert_eq!(report.rows_inserted, 0);
    assert_eq!(
        texts(&sheet),
        vec![vec!["Only", "", "x"], vec!["end", "", ""]]
    );
    assert_eq!(merges(&sheet), vec!["A1:B1"]);
}

#[test]
fn unknown_loop_is_skipped_without_panicking() {
    let settings = Settings::new().with_value("TITLE", "T");
    let mut sheet = invoice_template();
    let report = render_sheet(&mut sheet, &settings, &RenderConfig::default());

    assert_eq!(
        texts(&sheet),
        vec![
            vec!["T", "", ""],
            vec!["%ROW_NUMBER%", "%ITEM_NAME%", "%QTY%"],
            vec!["Total", "", ""],
        ]
    );
    assert_eq!(report.missing_loops, vec!["ITEMS".to_string()]);
}

#[test]
fn rendering_twice_changes_nothing() {
    let settings = invoice_settings();
    let mut sheet = invoice_template()
        .with_merge("B3:C3")
        .unwrap();
    render_sheet(&mut sheet, &settings, &RenderConfig::default());
    let once = sheet.clone();

    let report = render_sheet(&mut sheet, &settings, &RenderConfig::default());
    assert_eq!(sheet, once);
    assert_eq!(report.substitutions, 0);
}

#[test]
fn unmapped_keys_clear_in_every_record_row() {
    let data = LoopDataset::new(FieldMap::new().with("name", "ITEM_NAME"))
        .with_records(["a", "b", "c"].map(|n| MapRecord::new().with("name", n)));
    let settings = Settings::new()
        .with_value("PRICE", "scalar values do not leak into loops")
        .with_loop("ITEMS", data);
    let mut sheet = MemorySheet::from_rows(vec![
        vec!["%LOOP ITEMS%", ""],
        vec!["%ITEM_NAME%", "%PRICE%"],
    ]);
    render_sheet(&mut sheet, &settings, &RenderConfig::default());

    assert_eq!(
        texts(&sheet),
        vec![vec!["a", ""], vec!["b", ""], vec!["c", ""]]
    );
}

#[test]
fn duplicate_targets_use_first_source() {
    let data = LoopDataset::new(
        FieldMap::new()
            .with("primary", "NAME")
            .with("secondary", "NAME"),
    )
    .with_record(MapRecord::new().with("primary", "P").with("secondary", "S"));
    let settings = Settings::new().with_loop("L", data);
    let mut sheet = MemorySheet::from_rows(vec![vec!["%LOOP L%"], vec!["%NAME%"]]);
    render_sheet(&mut sheet, &settings, &RenderConfig::default());
    assert_eq!(sheet.cell_value(1, 1), LiteralValue::from("P"));
}

#[test]
fn right_bound_leaves_columns_at_and_after_it() {
    let settings = Settings::new()
        .with_value("A", "a")
        .with_value("B", "b")
        .with_value("C", "c")
        .with_value("D", "d");
    let mut sheet = MemorySheet::from_rows(vec![vec!["%A%", "%B%", "%C%", "%D%"]]);
    let config = RenderConfig::default().with_right_bound("C").unwrap();
    render_sheet(&mut sheet, &settings, &config);
    assert_eq!(texts(&sheet), vec![vec!["a", "b", "%C%", "%D%"]]);
}

#[test]
fn right_bound_stops_at_gaps_too() {
    // No cell exists in column C itself; D is still beyond the bound.
    let settings = Settings::new().with_value("A", "a").with_value("D", "d");
    let mut sheet = MemorySheet::from_rows(vec![vec![
        LiteralValue::from("%A%"),
        LiteralValue::Empty,
        LiteralValue::Empty,
        LiteralValue::from("%D%"),
    ]]);
    let config = RenderConfig::default().with_right_bound("C").unwrap();
    render_sheet(&mut sheet, &settings, &config);
    assert_eq!(sheet.cell_value(1, 4), LiteralValue::from("%D%"));
}

#[test]
fn loop_marker_beyond_right_bound_is_ignored() {
    let mut sheet = MemorySheet::from_rows(vec![
        vec!["", "", "%LOOP ITEMS%"],
        vec!["%ROW_NUMBER%", "", ""],
    ]);
    let config = RenderConfig::default().with_right_bound("C").unwrap();
    let report = render_sheet(&mut sheet, &invoice_settings(), &config);
    assert_eq!(report.loops_expanded, 0);
    assert_eq!(sheet.highest_row(), 2);
    // Ordinary substitution still happens in bounded columns.
    assert_eq!(sheet.cell_value(2, 1), LiteralValue::empty_text());
}

#[test]
fn consecutive_loops_expand_independently() {
    let letters = LoopDataset::new(FieldMap::new().with("v", "LETTER"))
        .with_records(["x", "y"].map(|v| MapRecord::new().with("v", v)));
    let digits = LoopDataset::new(FieldMap::new().with("v", "DIGIT"))
        .with_records([1, 2, 3].map(|v| MapRecord::new().with("v", v)));
    let settings = Settings::new()
        .with_loop("LETTERS", letters)
        .with_loop("DIGITS", digits);
    let mut sheet = MemorySheet::from_rows(vec![
        vec!["%LOOP LETTERS%"],
        vec!["%LETTER%"],
        vec!["%LOOP DIGITS%"],
        vec!["%DIGIT%"],
        vec!["end"],
    ]);
    let report = render_sheet(&mut sheet, &settings, &RenderConfig::default());

    assert_eq!(
        texts(&sheet),
        vec![
            vec!["x"],
            vec!["y"],
            vec!["1"],
            vec!["2"],
            vec!["3"],
            vec!["end"]
        ]
    );
    assert_eq!(report.loops_expanded, 2);
    assert_eq!(report.rows_removed, 2);
    assert_eq!(report.rows_inserted, 3);
}

#[derive(serde::Serialize)]
struct Employee {
    id: u32,
    full_name: String,
    active: bool,
}

#[test]
fn attribute_records_render_like_map_records() {
    let staff = [
        Employee {
            id: 7,
            full_name: "Grace".into(),
            active: true,
        },
        Employee {
            id: 9,
            full_name: "Alan".into(),
            active: false,
        },
    ];
    let data = LoopDataset::new(
        FieldMap::new()
            .with("id", "ID")
            .with("full_name", "NAME")
            .with("active", "ACTIVE"),
    )
    .with_records(
        staff
            .iter()
            .map(|e| AttributeRecord::from_serialize(e).unwrap()),
    );
    let settings = Settings::new().with_loop("STAFF", data);
    let mut sheet = MemorySheet::from_rows(vec![
        vec!["%LOOP STAFF%", "", ""],
        vec!["%ID%", "%NAME%", "%ACTIVE%"],
    ]);
    render_sheet(&mut sheet, &settings, &RenderConfig::default());

    assert_eq!(
        texts(&sheet),
        vec![vec!["7", "Grace", "TRUE"], vec!["9", "Alan", "FALSE"]]
    );
}

#[test]
fn empty_loop_clears_template_row_and_stays_stable() {
    let settings = Settings::new().with_value("TITLE", "Invoice").with_loop(
        "ITEMS",
        LoopDataset::new(FieldMap::new().with("name", "ITEM_NAME").with("qty", "QTY")),
    );
    let mut sheet = invoice_template();
    render_sheet(&mut sheet, &settings, &RenderConfig::default());

    assert_eq!(
        texts(&sheet),
        vec![
            vec!["Invoice", "", ""],
            vec!["", "", ""],
            vec!["Total", "", ""],
        ]
    );

    let once = sheet.clone();
    let report = render_sheet(&mut sheet, &settings, &RenderConfig::default());
    assert_eq!(sheet, once);
    assert_eq!(report.substitutions, 0);
}
