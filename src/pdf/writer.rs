// 出力PDF組立: RasterPage -> 画像XObject (FlateDecode) + ページ

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

use crate::pipeline::document::{OutputDocument, RasterPage};

/// ラスタページのみで構成される新しいPDFを組み立てる。
pub struct RasterPdfWriter {
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
}

impl Default for RasterPdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterPdfWriter {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
        }
    }

    /// 画像XObjectを追加する（DeviceRGB 8bit、可逆のFlateDecode）。
    ///
    /// アルファチャンネルは破棄される。戻り値はXObjectのオブジェクトID。
    pub fn add_image_xobject(&mut self, page: &RasterPage) -> crate::error::Result<ObjectId> {
        let rgb = page.image.to_rgb8();
        let (width, height) = rgb.dimensions();

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(rgb.as_raw())?;
        let compressed = encoder.finish()?;

        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
        };
        let stream = Stream::new(dict, compressed);
        Ok(self.doc.add_object(Object::Stream(stream)))
    }

    /// 画像をページ全体に描画するコンテンツストリームを生成する。
    ///
    /// `q <width> 0 0 <height> 0 0 cm /<name> Do Q`
    pub fn build_page_content_stream(name: &str, width_pts: f64, height_pts: f64) -> Vec<u8> {
        format!("q {width_pts:.4} 0 0 {height_pts:.4} 0 0 cm /{name} Do Q").into_bytes()
    }

    /// RasterPageから1ページを追加する。ページサイズは元ページのサイズ（ポイント）。
    pub fn write_page(&mut self, page: &RasterPage) -> crate::error::Result<ObjectId> {
        if !(page.width_pts > 0.0 && page.height_pts > 0.0) {
            return Err(crate::error::InkSaverError::pdf_write(format!(
                "page {} has invalid size {}x{} pt",
                page.source_index + 1,
                page.width_pts,
                page.height_pts
            )));
        }

        let image_id = self.add_image_xobject(page)?;

        let mut xobject_dict = lopdf::Dictionary::new();
        xobject_dict.set("Im0", Object::Reference(image_id));
        let resources_id = self.doc.add_object(dictionary! {
            "XObject" => Object::Dictionary(xobject_dict),
        });

        let content_bytes = Self::build_page_content_stream("Im0", page.width_pts, page.height_pts);
        let content_id = self
            .doc
            .add_object(Object::Stream(Stream::new(dictionary! {}, content_bytes)));

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(page.width_pts as f32),
                Object::Real(page.height_pts as f32),
            ],
            "Resources" => resources_id,
            "Contents" => content_id,
        });
        self.page_ids.push(page_id);
        Ok(page_id)
    }

    /// OutputDocumentの全ページを入力順に追加する。
    pub fn write_document(&mut self, document: &OutputDocument) -> crate::error::Result<()> {
        for page in document.pages() {
            self.write_page(page)?;
        }
        Ok(())
    }

    /// Pagesノード・Catalogを確定し、PDFドキュメントをバイト列として出力する。
    pub fn save_to_bytes(mut self) -> crate::error::Result<Vec<u8>> {
        let kids: Vec<Object> = self.page_ids.iter().map(|&id| id.into()).collect();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.page_ids.len() as i64,
        };
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        self.doc
            .save_to(&mut buf)
            .map_err(|e| crate::error::InkSaverError::pdf_write(e.to_string()))?;
        Ok(buf)
    }
}

/// OutputDocumentをPDFバイト列に変換する。
pub fn render_output_pdf(document: &OutputDocument) -> crate::error::Result<Vec<u8>> {
    let mut writer = RasterPdfWriter::new();
    writer.write_document(document)?;
    writer.save_to_bytes()
}
