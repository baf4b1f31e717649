use std::collections::HashSet;
use std::path::Path;

use lopdf::Document;

use crate::pipeline::document::{SourceDocument, SourcePage};

/// Input PDF opened with lopdf. Page sizes are read once at open time;
/// rendering goes back to the file itself.
pub struct PdfReader {
    /// MediaBox size per page in points; `None` if the page has no usable MediaBox.
    page_sizes: Vec<Option<(f64, f64)>>,
}

impl PdfReader {
    /// PDFファイルを開いてPdfReaderを作成する。
    pub fn open(path: impl AsRef<Path>) -> crate::error::Result<Self> {
        let doc = Document::load(path)?;
        Ok(Self::from_document(&doc))
    }

    /// メモリ上のPDFバイト列からPdfReaderを作成する。
    pub fn from_bytes(bytes: &[u8]) -> crate::error::Result<Self> {
        let doc = Document::load_mem(bytes)?;
        Ok(Self::from_document(&doc))
    }

    fn from_document(doc: &Document) -> Self {
        let page_ids: Vec<lopdf::ObjectId> = doc.get_pages().into_values().collect();
        let page_sizes = page_ids
            .into_iter()
            .map(|id| {
                doc.get_dictionary(id)
                    .ok()
                    .and_then(|dict| media_box_size(doc, dict).ok())
            })
            .collect();
        Self { page_sizes }
    }

    /// ページ数を返す。
    pub fn page_count(&self) -> u32 {
        self.page_sizes.len() as u32
    }

    /// 指定ページ(1-indexed)のMediaBoxからページ寸法(width_pts, height_pts)を返す。
    pub fn page_dimensions(&self, page_num: u32) -> crate::error::Result<(f64, f64)> {
        let idx = page_num
            .checked_sub(1)
            .ok_or_else(|| crate::error::InkSaverError::pdf_read("page numbers start at 1"))?;
        self.page_sizes
            .get(idx as usize)
            .copied()
            .flatten()
            .ok_or_else(|| {
                crate::error::InkSaverError::pdf_read(format!(
                    "page {page_num} not found or has no MediaBox"
                ))
            })
    }
}

impl SourceDocument for PdfReader {
    fn page_count(&self) -> usize {
        self.page_sizes.len()
    }

    fn page(&self, index: usize) -> Option<SourcePage> {
        let (width_pts, height_pts) = self.page_sizes.get(index).copied().flatten()?;
        Some(SourcePage {
            index,
            width_pts,
            height_pts,
        })
    }
}

/// MediaBoxを取得する（Parent経由の継承も考慮）。
///
/// Parentの循環は一度訪れたノードで打ち切り、MediaBoxなしとして扱う。
fn media_box_object(
    doc: &Document,
    dict: &lopdf::Dictionary,
) -> crate::error::Result<lopdf::Object> {
    let mut visited: HashSet<lopdf::ObjectId> = HashSet::new();
    let mut current = dict;

    loop {
        if let Ok(obj) = current.get(b"MediaBox") {
            return Ok(obj.clone());
        }
        match current.get(b"Parent") {
            Ok(lopdf::Object::Reference(parent_id)) if visited.insert(*parent_id) => {
                current = doc.get_dictionary(*parent_id)?;
            }
            _ => break,
        }
    }

    Err(crate::error::InkSaverError::pdf_read("MediaBox not found"))
}

/// MediaBoxの幅・高さ（ポイント）。値の正負は検証しない（ページ処理側で検証する）。
fn media_box_size(doc: &Document, dict: &lopdf::Dictionary) -> crate::error::Result<(f64, f64)> {
    let media_box = match media_box_object(doc, dict)? {
        lopdf::Object::Reference(id) => doc.get_object(id)?.clone(),
        obj => obj,
    };
    let media_box_array = media_box.as_array()?;
    if media_box_array.len() < 4 {
        return Err(crate::error::InkSaverError::pdf_read("Invalid MediaBox"));
    }

    // MediaBoxの値は整数または実数の可能性がある
    let to_f64 = |obj: &lopdf::Object| -> crate::error::Result<f64> {
        match obj {
            lopdf::Object::Integer(i) => Ok(*i as f64),
            lopdf::Object::Real(f) => Ok(*f as f64),
            _ => Err(crate::error::InkSaverError::pdf_read(
                "Invalid MediaBox value",
            )),
        }
    };

    let x0 = to_f64(&media_box_array[0])?;
    let y0 = to_f64(&media_box_array[1])?;
    let x1 = to_f64(&media_box_array[2])?;
    let y1 = to_f64(&media_box_array[3])?;

    Ok(((x1 - x0).abs(), (y1 - y0).abs()))
}
