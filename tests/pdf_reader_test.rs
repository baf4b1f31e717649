use lopdf::{Document, Object, Stream, dictionary};
use pdf_ink_saver::pdf::reader::PdfReader;
use pdf_ink_saver::pipeline::document::SourceDocument;

/// ヘルパー: ページごとのMediaBox（Noneなら省略）と、親Pagesノードの
/// MediaBox（Noneなら省略）を持つ最小限のPDFを作成する
fn create_test_pdf(
    page_boxes: Vec<Option<Vec<Object>>>,
    parent_box: Option<Vec<Object>>,
) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for media_box in page_boxes {
        let contents_id = doc.add_object(Stream::new(dictionary! {}, vec![]));
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => contents_id,
        };
        if let Some(media_box) = media_box {
            page.set("MediaBox", media_box);
        }
        kids.push(Object::from(doc.add_object(page)));
    }

    let count = kids.len() as i64;
    let mut pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
    };
    if let Some(media_box) = parent_box {
        pages.set("MediaBox", media_box);
    }
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

fn ints(values: [i64; 4]) -> Vec<Object> {
    values.into_iter().map(Object::Integer).collect()
}

#[test]
fn test_page_dimensions_basic_functionality() {
    // A4サイズ（595.276 × 841.89 pt）
    let media_box = vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Real(595.276),
        Object::Real(841.89),
    ];
    let bytes = create_test_pdf(vec![Some(media_box)], None);

    let reader = PdfReader::from_bytes(&bytes).unwrap();
    let (width, height) = reader.page_dimensions(1).unwrap();

    assert!((width - 595.276).abs() < 0.01, "width should be ~595.276");
    assert!((height - 841.89).abs() < 0.01, "height should be ~841.89");
}

#[test]
fn test_open_from_file() {
    let bytes = create_test_pdf(vec![Some(ints([0, 0, 612, 792]))], None);
    let temp_file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(temp_file.path(), &bytes).unwrap();

    let reader = PdfReader::open(temp_file.path()).unwrap();
    assert_eq!(reader.page_count(), 1);
    assert_eq!(reader.page_dimensions(1).unwrap(), (612.0, 792.0));
}

#[test]
fn test_page_dimensions_with_non_zero_origin() {
    let bytes = create_test_pdf(vec![Some(ints([10, 20, 605, 812]))], None);
    let reader = PdfReader::from_bytes(&bytes).unwrap();

    assert_eq!(reader.page_dimensions(1).unwrap(), (595.0, 792.0));
}

#[test]
fn test_page_dimensions_inherited_from_parent() {
    // MediaBoxが親Pagesノードから継承される場合
    let bytes = create_test_pdf(vec![None], Some(ints([0, 0, 612, 792])));
    let reader = PdfReader::from_bytes(&bytes).unwrap();

    assert_eq!(reader.page_dimensions(1).unwrap(), (612.0, 792.0));
}

#[test]
fn test_reversed_media_box_uses_absolute_size() {
    let bytes = create_test_pdf(vec![Some(ints([612, 792, 0, 0]))], None);
    let reader = PdfReader::from_bytes(&bytes).unwrap();

    assert_eq!(reader.page_dimensions(1).unwrap(), (612.0, 792.0));
}

#[test]
fn test_zero_width_page_is_reported_not_rejected() {
    // 寸法の妥当性はページ処理側で判定する
    let bytes = create_test_pdf(vec![Some(ints([0, 0, 0, 792]))], None);
    let reader = PdfReader::from_bytes(&bytes).unwrap();

    let page = reader.page(0).unwrap();
    assert_eq!(page.width_pts, 0.0);
    assert!(!page.has_valid_dimensions());
}

#[test]
fn test_missing_media_box_makes_page_unreadable() {
    let bytes = create_test_pdf(
        vec![Some(ints([0, 0, 100, 200])), None],
        None,
    );
    let reader = PdfReader::from_bytes(&bytes).unwrap();

    assert_eq!(SourceDocument::page_count(&reader), 2);
    assert!(reader.page(0).is_some());
    assert!(reader.page(1).is_none());
    assert!(reader.page_dimensions(2).is_err());
}

#[test]
fn test_invalid_media_box_format() {
    // MediaBoxが3要素しかない
    let media_box = vec![Object::Integer(0), Object::Integer(0), Object::Integer(612)];
    let bytes = create_test_pdf(vec![Some(media_box)], None);
    let reader = PdfReader::from_bytes(&bytes).unwrap();

    assert!(reader.page(0).is_none());
}

#[test]
fn test_source_pages_follow_document_order() {
    let bytes = create_test_pdf(
        vec![
            Some(ints([0, 0, 100, 100])),
            Some(ints([0, 0, 200, 100])),
            Some(ints([0, 0, 300, 100])),
        ],
        None,
    );
    let reader = PdfReader::from_bytes(&bytes).unwrap();

    let widths: Vec<f64> = (0..3).map(|i| reader.page(i).unwrap().width_pts).collect();
    assert_eq!(widths, vec![100.0, 200.0, 300.0]);
    assert_eq!(reader.page(2).unwrap().index, 2);
    assert!(reader.page(3).is_none());
}

#[test]
fn test_page_number_zero_is_an_error() {
    let bytes = create_test_pdf(vec![Some(ints([0, 0, 10, 10]))], None);
    let reader = PdfReader::from_bytes(&bytes).unwrap();

    assert!(reader.page_dimensions(0).is_err());
}

#[test]
fn test_garbage_bytes_fail_to_open() {
    assert!(PdfReader::from_bytes(b"not a pdf").is_err());
}

#[test]
fn test_parent_cycle_makes_page_unreadable() {
    // ページにMediaBoxがなく、親Pagesノードが自分自身をParentに持つ
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let contents_id = doc.add_object(Stream::new(dictionary! {}, vec![]));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => contents_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Parent" => pages_id,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();

    let reader = PdfReader::from_bytes(&bytes).unwrap();
    assert_eq!(reader.page_count(), 1);
    assert!(reader.page(0).is_none());
    assert!(reader.page_dimensions(1).is_err());
}
