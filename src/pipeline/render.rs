//! Report renderer — builds the paginated verification PDF.
//!
//! Layout: centered title, bordered metadata table (shaded label column),
//! then one section per schema entry with an inline preview. Raster images
//! are embedded scaled to a 4×4 inch bounding box (never upscaled); PDFs and
//! unsupported types get an italic note instead. Every document's raw bytes
//! are persisted into the working directory as a side effect — the package
//! builder picks them up from disk.

use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use printpdf::image_crate::GenericImageView;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Polygon, Rgb,
};

use super::schema::{DocumentSchema, TransactionCategory, VerificationOutcome};
use super::validate::UploadedDocumentSet;
use super::PipelineError;

const PAGE_WIDTH: f32 = 210.0; // A4, mm
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_LEFT: f32 = 20.0;
const MARGIN_BOTTOM: f32 = 20.0;
const TOP_Y: f32 = 277.0;

/// Preview bounding box: 4 × 4 inches.
const PREVIEW_MAX_MM: f32 = 101.6;
/// Resolution images are embedded at; natural size on page derives from it.
const IMAGE_DPI: f32 = 300.0;

const SECTION_GAP: f32 = 12.0;

/// Uniform scale factor fitting `width × height` into a square box without
/// ever upscaling.
pub(crate) fn preview_scale(width_mm: f32, height_mm: f32, max_mm: f32) -> f32 {
    (max_mm / width_mm).min(max_mm / height_mm).min(1.0)
}

/// Media type without parameters ("image/png; charset=x" → "image/png").
fn media_essence(media_type: &str) -> &str {
    media_type.split(';').next().unwrap_or(media_type).trim()
}

/// Subtype portion used for the persisted file extension.
pub(crate) fn media_subtype(media_type: &str) -> &str {
    media_essence(media_type)
        .split('/')
        .nth(1)
        .filter(|s| !s.is_empty())
        .unwrap_or("bin")
}

/// Write cursor over a growing document. Adds pages as sections run past the
/// bottom margin.
struct PageCursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: Mm,
}

impl PageCursor<'_> {
    fn ensure_room(&mut self, needed: f32) {
        if self.y.0 - needed < MARGIN_BOTTOM {
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = Mm(TOP_Y);
        }
    }

    fn advance(&mut self, by: f32) {
        self.y = Mm(self.y.0 - by);
    }
}

fn rect(x: f32, y_top: f32, width: f32, height: f32, mode: PaintMode) -> Polygon {
    Polygon {
        rings: vec![vec![
            (Point::new(Mm(x), Mm(y_top)), false),
            (Point::new(Mm(x + width), Mm(y_top)), false),
            (Point::new(Mm(x + width), Mm(y_top - height)), false),
            (Point::new(Mm(x), Mm(y_top - height)), false),
        ]],
        mode,
        winding_order: WindingOrder::NonZero,
    }
}

/// Renders the report and persists each document's raw bytes alongside it.
/// Returns the path of the written report PDF.
pub fn render(
    order: &str,
    category: TransactionCategory,
    outcome: VerificationOutcome,
    documents: &UploadedDocumentSet,
    schema: DocumentSchema,
    working_dir: &Path,
) -> Result<PathBuf, PipelineError> {
    tracing::info!(order = %order, "Rendering verification report");

    let (doc, page, layer) = PdfDocument::new(
        format!("Informe {order}"),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| PipelineError::Pdf(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| PipelineError::Pdf(e.to_string()))?;
    let italic = doc
        .add_builtin_font(BuiltinFont::HelveticaOblique)
        .map_err(|e| PipelineError::Pdf(e.to_string()))?;

    let mut cursor = PageCursor {
        doc: &doc,
        layer: doc.get_page(page).get_layer(layer),
        y: Mm(TOP_Y),
    };

    draw_title(&mut cursor, &bold);
    draw_metadata_table(&mut cursor, order, category, outcome, &regular, &bold);

    for (key, label) in schema {
        let Some(document) = documents.get(*key) else {
            // Post-validation contract says this cannot happen.
            tracing::warn!(key, "Document absent from validated set; skipping section");
            continue;
        };

        let file_name = format!("{label}.{}", media_subtype(&document.media_type));
        fs::write(working_dir.join(&file_name), &document.bytes)?;

        cursor.ensure_room(16.0);
        cursor
            .layer
            .use_text(format!("Documento: {label}"), 12.0, Mm(MARGIN_LEFT), cursor.y, &bold);
        cursor.advance(8.0);

        draw_preview(&mut cursor, document.media_type.as_str(), &document.bytes, &italic, &file_name);
        cursor.advance(SECTION_GAP);
    }

    let report_path = working_dir.join(format!("Informe_{order}.pdf"));
    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| PipelineError::Pdf(e.to_string()))?;
    let bytes = buf
        .into_inner()
        .map_err(|e| PipelineError::Pdf(e.to_string()))?;
    fs::write(&report_path, bytes)?;

    Ok(report_path)
}

fn draw_title(cursor: &mut PageCursor<'_>, bold: &IndirectFontRef) {
    const TITLE: &str = "Informe de Verificación de Transacción P2P";
    const SIZE: f32 = 18.0;

    // Approximate Helvetica-Bold advance (~0.55 em) to center the line.
    let width_mm = TITLE.chars().count() as f32 * SIZE * 0.55 * 0.3528;
    let x = ((PAGE_WIDTH - width_mm) / 2.0).max(MARGIN_LEFT);

    cursor.layer.use_text(TITLE, SIZE, Mm(x), cursor.y, bold);
    cursor.advance(14.0);
}

fn draw_metadata_table(
    cursor: &mut PageCursor<'_>,
    order: &str,
    category: TransactionCategory,
    outcome: VerificationOutcome,
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
) {
    const LABEL_WIDTH: f32 = 55.0;
    const VALUE_WIDTH: f32 = 115.0;
    const ROW_HEIGHT: f32 = 9.0;

    let rows: [(&str, &str); 3] = [
        ("Número de Transacción:", order),
        ("Tipo de Transacción:", category.label()),
        ("Estado de Verificación:", outcome.label()),
    ];

    cursor.ensure_room(ROW_HEIGHT * rows.len() as f32 + SECTION_GAP);

    let shade = Color::Rgb(Rgb::new(0.949, 0.949, 0.949, None)); // #f2f2f2
    let grid = Color::Rgb(Rgb::new(0.867, 0.867, 0.867, None)); // #dddddd
    let ink = Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None));

    cursor.layer.set_outline_thickness(0.4);

    for (i, (label, value)) in rows.iter().enumerate() {
        let y_top = cursor.y.0 - ROW_HEIGHT * i as f32;

        cursor.layer.set_fill_color(shade.clone());
        cursor
            .layer
            .add_polygon(rect(MARGIN_LEFT, y_top, LABEL_WIDTH, ROW_HEIGHT, PaintMode::Fill));

        cursor.layer.set_outline_color(grid.clone());
        cursor
            .layer
            .add_polygon(rect(MARGIN_LEFT, y_top, LABEL_WIDTH, ROW_HEIGHT, PaintMode::Stroke));
        cursor.layer.add_polygon(rect(
            MARGIN_LEFT + LABEL_WIDTH,
            y_top,
            VALUE_WIDTH,
            ROW_HEIGHT,
            PaintMode::Stroke,
        ));

        cursor.layer.set_fill_color(ink.clone());
        let text_y = Mm(y_top - 6.0);
        cursor
            .layer
            .use_text(*label, 10.0, Mm(MARGIN_LEFT + 2.0), text_y, bold);
        cursor.layer.use_text(
            *value,
            10.0,
            Mm(MARGIN_LEFT + LABEL_WIDTH + 2.0),
            text_y,
            regular,
        );
    }

    cursor.advance(ROW_HEIGHT * rows.len() as f32 + SECTION_GAP);
}

fn draw_preview(
    cursor: &mut PageCursor<'_>,
    media_type: &str,
    bytes: &[u8],
    italic: &IndirectFontRef,
    file_name: &str,
) {
    let essence = media_essence(media_type);

    if essence.starts_with("image/") {
        match printpdf::image_crate::load_from_memory(bytes) {
            Ok(img) => {
                let (px_w, px_h) = img.dimensions();
                let natural_w = px_w as f32 * 25.4 / IMAGE_DPI;
                let natural_h = px_h as f32 * 25.4 / IMAGE_DPI;
                let scale = preview_scale(natural_w, natural_h, PREVIEW_MAX_MM);
                let drawn_h = natural_h * scale;

                cursor.ensure_room(drawn_h);
                let bottom = Mm(cursor.y.0 - drawn_h);
                Image::from_dynamic_image(&img).add_to_layer(
                    cursor.layer.clone(),
                    ImageTransform {
                        translate_x: Some(Mm(MARGIN_LEFT)),
                        translate_y: Some(bottom),
                        scale_x: Some(scale),
                        scale_y: Some(scale),
                        dpi: Some(IMAGE_DPI),
                        ..Default::default()
                    },
                );
                cursor.advance(drawn_h);
            }
            Err(e) => {
                tracing::warn!(file = %file_name, error = %e, "Image preview failed, using fallback note");
                note(cursor, "No se pudo mostrar la vista previa de la imagen.", italic);
            }
        }
    } else if essence == "application/pdf" {
        note(cursor, "Contenido del PDF: ver archivo adjunto.", italic);
    } else {
        note(cursor, "Tipo de archivo no compatible para vista previa.", italic);
    }
}

fn note(cursor: &mut PageCursor<'_>, text: &str, italic: &IndirectFontRef) {
    cursor.ensure_room(6.0);
    cursor.layer.use_text(text, 10.0, Mm(MARGIN_LEFT), cursor.y, italic);
    cursor.advance(6.0);
}
