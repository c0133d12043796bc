//! PDF output through `printpdf` with the builtin Helvetica faces.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::{BuiltinFont, Mm, PdfDocument};
use tracing::debug;

use projectbook_shared::{PageSize, ProjectBookError, Result};

use crate::document::Font;
use crate::layout::LaidOutPage;

const LAYER_NAME: &str = "Layer 1";

fn mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

/// Write laid-out pages to `path`.
pub fn write_pdf(pages: &[LaidOutPage], page_size: PageSize, title: &str, path: &Path) -> Result<()> {
    let (width, height) = page_size.dimensions_pt();
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, mm(width), mm(height), LAYER_NAME);

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ProjectBookError::Render(format!("failed to load Helvetica: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ProjectBookError::Render(format!("failed to load Helvetica-Bold: {e}")))?;

    for (index, page) in pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_idx, layer_idx) = doc.add_page(mm(width), mm(height), LAYER_NAME);
            doc.get_page(page_idx).get_layer(layer_idx)
        };

        for line in &page.lines {
            let font = match line.font {
                Font::Helvetica => &regular,
                Font::HelveticaBold => &bold,
            };
            layer.use_text(line.text.as_str(), line.size, mm(line.x), mm(line.y), font);
        }
    }

    let file = File::create(path).map_err(|e| ProjectBookError::io(path, e))?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| ProjectBookError::Render(format!("failed to write PDF: {e}")))?;

    debug!(path = %path.display(), pages = pages.len(), "PDF written");
    Ok(())
}
