//! End-to-end tests: build a presentation from a frame, save it, read it back.
//!
//! Run with: cargo test --test end_to_end

use pptable::model::{CellAlignment, Document};
use pptable::{
    add_slide, add_title, df_to_table, format_table, DataFrame, Length, Presentation,
    PresentationReader, TableOptions, TitleOptions, Value,
};
use pretty_assertions::assert_eq;

fn int_frame() -> DataFrame {
    DataFrame::new(
        vec!["north", "south"],
        vec![
            vec![Value::Int(1234), Value::Int(56789)],
            vec![Value::Int(1000000), Value::Int(7)],
        ],
    )
    .unwrap()
    .with_index(vec!["2023", "2024"])
    .unwrap()
}

fn save_and_read(pres: &Presentation) -> Document {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deck.pptx");
    pres.save(&path).unwrap();
    PresentationReader::open(&path).unwrap().parse().unwrap()
}

fn texts(doc: &Document, name: &str) -> Vec<Vec<String>> {
    doc.table_by_name(name)
        .unwrap_or_else(|| panic!("no table named {name}"))
        .texts()
}

#[test]
fn vertical_table_has_header_and_separated_integers() {
    let mut pres = Presentation::new();
    let slide = add_slide(&mut pres);
    df_to_table(slide, &int_frame(), &TableOptions::new().with_name("Units")).unwrap();

    let doc = save_and_read(&pres);
    assert_eq!(
        texts(&doc, "Units"),
        vec![
            vec!["north", "south"],
            vec!["1,234", "56,789"],
            vec!["1,000,000", "7"],
        ]
    );
}

#[test]
fn transposed_table_has_label_column() {
    let mut pres = Presentation::new();
    let slide = add_slide(&mut pres);
    let options = TableOptions::new().with_transposed(true).with_name("Units");
    df_to_table(slide, &int_frame(), &options).unwrap();

    let doc = save_and_read(&pres);
    assert_eq!(
        texts(&doc, "Units"),
        vec![vec!["2023", "1,234", "56,789"], vec!["2024", "1,000,000", "7"]]
    );
}

#[test]
fn default_styling_survives_save() {
    let mut pres = Presentation::new();
    let slide = add_slide(&mut pres);
    let options = TableOptions::new().with_transposed(true).with_name("Styled");
    df_to_table(slide, &int_frame(), &options).unwrap();

    let doc = save_and_read(&pres);
    let table = doc.table_by_name("Styled").unwrap();

    let label = table.cell(0, 0).unwrap();
    assert!(label.bold);
    assert_eq!(label.alignment, CellAlignment::Left);
    assert_eq!(label.background.as_deref(), Some("4F81BD"));
    assert_eq!(label.font_size, Some(14.0));

    let first_row = table.cell(0, 1).unwrap();
    assert!(!first_row.bold);
    assert_eq!(first_row.alignment, CellAlignment::Center);
    assert_eq!(first_row.background.as_deref(), Some("E9EDF4"));

    let body = table.cell(1, 2).unwrap();
    assert_eq!(body.background, None);
}

#[test]
fn white_background_leaves_cells_plain() {
    let mut pres = Presentation::new();
    let slide = add_slide(&mut pres);
    let options = TableOptions::new().with_white_background(true).with_name("Plain");
    df_to_table(slide, &int_frame(), &options).unwrap();

    let doc = save_and_read(&pres);
    let header = doc.table_by_name("Plain").unwrap().cell(0, 0).unwrap().clone();
    assert!(!header.bold);
    assert_eq!(header.background, None);
    assert_eq!(header.font_size, None);
}

#[test]
fn formatters_rounding_and_geometry() {
    let frame = DataFrame::new(
        vec!["share", "revenue", "label"],
        vec![
            vec![Value::Float(0.1234), Value::Float(1234.5678), Value::from("a")],
            vec![Value::Float(0.5), Value::Float(98765.4321), Value::from("b")],
        ],
    )
    .unwrap();

    let mut pres = Presentation::new();
    let slide = add_slide(&mut pres);
    let options = TableOptions::new()
        .with_name("Fmt")
        .with_colnames(["Share", "Revenue", "Label"])
        .with_col_formatters([",.1%", ",.2f", ""])
        .with_rounding([None, Some(2), None])
        .with_col_widths([Length::cm(3.0)])
        .with_row_heights([Length::cm(1.0)]);
    df_to_table(slide, &frame, &options).unwrap();

    let doc = save_and_read(&pres);
    let table = doc.table_by_name("Fmt").unwrap();
    assert_eq!(
        table.texts(),
        vec![
            vec!["Share", "Revenue", "Label"],
            vec!["12.3%", "1,200.00", "a"],
            vec!["50.0%", "98,800.00", "b"],
        ]
    );
    assert_eq!(table.column_widths[0], Length::cm(3.0).to_emu());
    assert_eq!(table.rows[0].height, Some(Length::cm(1.0).to_emu()));
}

#[test]
fn title_and_table_on_one_slide() {
    let mut pres = Presentation::new();
    pres.set_title("Quarterly");
    let slide = add_slide(&mut pres);
    add_title(slide, &TitleOptions::new("Units by region"));
    df_to_table(slide, &int_frame(), &TableOptions::default()).unwrap();

    let doc = save_and_read(&pres);
    assert_eq!(doc.metadata.title.as_deref(), Some("Quarterly"));
    assert_eq!(doc.slides.len(), 1);
    assert_eq!(doc.slides[0].texts(), vec!["Units by region"]);
    assert_eq!(doc.slides[0].tables().count(), 1);
}

#[test]
fn format_table_restyles_region() {
    let mut pres = Presentation::new();
    let slide = add_slide(&mut pres);
    let shape = df_to_table(slide, &int_frame(), &TableOptions::new().with_name("Boxed")).unwrap();
    format_table(shape.table_mut().unwrap(), 2, 2).unwrap();

    let doc = save_and_read(&pres);
    let table = doc.table_by_name("Boxed").unwrap();
    let cell = table.cell(1, 1).unwrap();
    assert!(cell.bold);
    assert_eq!(cell.font_size, Some(20.0));
    assert_eq!(cell.alignment, CellAlignment::Center);
    assert_eq!(cell.text, "56,789");
}

#[test]
fn slides_keep_their_order() {
    let mut pres = Presentation::new();
    for n in 0..3 {
        let frame = DataFrame::new(vec!["n"], vec![vec![Value::Int(n * 1000)]]).unwrap();
        let slide = add_slide(&mut pres);
        df_to_table(slide, &frame, &TableOptions::new().with_name(format!("T{n}"))).unwrap();
    }

    let doc = save_and_read(&pres);
    assert_eq!(doc.slides.len(), 3);
    for (n, slide) in doc.slides.iter().enumerate() {
        let table = slide.tables().next().unwrap();
        assert_eq!(table.name.as_deref(), Some(format!("T{n}").as_str()));
    }
    assert_eq!(texts(&doc, "T2"), vec![vec!["n"], vec!["2,000"]]);
}

#[test]
fn csv_frame_end_to_end() {
    let csv = "city,population\nSeoul,9776000\nBusan,3429000\n";
    let frame = DataFrame::from_csv_reader(csv.as_bytes())
        .unwrap()
        .set_index("city")
        .unwrap();

    let mut pres = Presentation::new();
    let slide = add_slide(&mut pres);
    let options = TableOptions::new().with_transposed(true).with_name("Cities");
    df_to_table(slide, &frame, &options).unwrap();

    let doc = save_and_read(&pres);
    assert_eq!(
        texts(&doc, "Cities"),
        vec![vec!["Seoul", "9,776,000"], vec!["Busan", "3,429,000"]]
    );
}

#[test]
fn rendered_grid_matches_table() {
    let mut pres = Presentation::new();
    let slide = add_slide(&mut pres);
    df_to_table(slide, &int_frame(), &TableOptions::new().with_name("Grid")).unwrap();

    let doc = save_and_read(&pres);
    let grid = pptable::render::table_to_text(doc.table_by_name("Grid").unwrap());
    assert_eq!(
        grid,
        "\
+-----------+--------+
|   north   | south  |
+===========+========+
|   1,234   | 56,789 |
| 1,000,000 |   7    |
+-----------+--------+"
    );
}
