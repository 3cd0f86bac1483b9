//! Fixed-layout PDF invoice renderer.
//!
//! Pure presentation over already-assembled line items: title block,
//! a tabular section at fixed column offsets, and a subtotal / 15% tax
//! / grand total footer. Rows paginate at [`ROWS_PER_PAGE`].

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use rust_decimal::Decimal;

use crate::error::AppError;

pub const TAX_RATE_PERCENT: i64 = 15;
const ROWS_PER_PAGE: usize = 30;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const ROW_STEP_MM: f32 = 8.0;

// Column offsets from the left edge.
const COL_DESCRIPTION_MM: f32 = 20.0;
const COL_QUANTITY_MM: f32 = 110.0;
const COL_UNIT_PRICE_MM: f32 = 135.0;
const COL_AMOUNT_MM: f32 = 170.0;

/// One row of the invoice table.
#[derive(Debug, Clone)]
pub struct InvoiceLine {
    pub name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl InvoiceLine {
    pub fn amount(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

pub fn totals(lines: &[InvoiceLine]) -> InvoiceTotals {
    let subtotal: Decimal = lines.iter().map(InvoiceLine::amount).sum();
    let tax = (subtotal * Decimal::new(TAX_RATE_PERCENT, 0) / Decimal::new(100, 0)).round_dp(2);
    InvoiceTotals {
        subtotal,
        tax,
        total: subtotal + tax,
    }
}

/// Render the invoice to PDF bytes.
pub fn render(
    store_name: &str,
    invoice_number: &str,
    issued_on: &str,
    currency: &str,
    lines: &[InvoiceLine],
) -> Result<Vec<u8>, AppError> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        format!("Invoice {invoice_number}"),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::Internal(format!("pdf font: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| AppError::Internal(format!("pdf font: {e}")))?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);

    // Title block.
    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;
    layer.use_text(store_name, 20.0, Mm(COL_DESCRIPTION_MM), Mm(y), &bold);
    y -= 10.0;
    layer.use_text(
        format!("Invoice {invoice_number}"),
        11.0,
        Mm(COL_DESCRIPTION_MM),
        Mm(y),
        &font,
    );
    y -= 6.0;
    layer.use_text(issued_on, 11.0, Mm(COL_DESCRIPTION_MM), Mm(y), &font);
    y -= 12.0;

    draw_column_headers(&layer, y, &bold);
    y -= ROW_STEP_MM;

    let mut rows_on_page = 0;
    for line in lines {
        if rows_on_page == ROWS_PER_PAGE {
            let (page, layer_idx) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            layer = doc.get_page(page).get_layer(layer_idx);
            y = PAGE_HEIGHT_MM - MARGIN_MM;
            draw_column_headers(&layer, y, &bold);
            y -= ROW_STEP_MM;
            rows_on_page = 0;
        }
        layer.use_text(&line.name, 10.0, Mm(COL_DESCRIPTION_MM), Mm(y), &font);
        layer.use_text(
            line.quantity.to_string(),
            10.0,
            Mm(COL_QUANTITY_MM),
            Mm(y),
            &font,
        );
        layer.use_text(
            format!("{} {}", line.unit_price.round_dp(2), currency),
            10.0,
            Mm(COL_UNIT_PRICE_MM),
            Mm(y),
            &font,
        );
        layer.use_text(
            format!("{} {}", line.amount().round_dp(2), currency),
            10.0,
            Mm(COL_AMOUNT_MM),
            Mm(y),
            &font,
        );
        y -= ROW_STEP_MM;
        rows_on_page += 1;
    }

    // Totals footer, continuing on the current page when it fits.
    let t = totals(lines);
    y -= ROW_STEP_MM;
    if y < MARGIN_MM + 2.0 * ROW_STEP_MM {
        let (page, layer_idx) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        layer = doc.get_page(page).get_layer(layer_idx);
        y = PAGE_HEIGHT_MM - MARGIN_MM;
    }
    layer.use_text("Subtotal", 11.0, Mm(COL_UNIT_PRICE_MM), Mm(y), &font);
    layer.use_text(
        format!("{} {}", t.subtotal.round_dp(2), currency),
        11.0,
        Mm(COL_AMOUNT_MM),
        Mm(y),
        &font,
    );
    y -= 6.0;
    layer.use_text(
        format!("Tax ({TAX_RATE_PERCENT}%)"),
        11.0,
        Mm(COL_UNIT_PRICE_MM),
        Mm(y),
        &font,
    );
    layer.use_text(
        format!("{} {}", t.tax.round_dp(2), currency),
        11.0,
        Mm(COL_AMOUNT_MM),
        Mm(y),
        &font,
    );
    y -= 7.0;
    layer.use_text("Total", 12.0, Mm(COL_UNIT_PRICE_MM), Mm(y), &bold);
    layer.use_text(
        format!("{} {}", t.total.round_dp(2), currency),
        12.0,
        Mm(COL_AMOUNT_MM),
        Mm(y),
        &bold,
    );

    doc.save_to_bytes()
        .map_err(|e| AppError::Internal(format!("pdf save: {e}")))
}

fn draw_column_headers(layer: &PdfLayerReference, y: f32, bold: &IndirectFontRef) {
    layer.use_text("Description", 11.0, Mm(COL_DESCRIPTION_MM), Mm(y), bold);
    layer.use_text("Qty", 11.0, Mm(COL_QUANTITY_MM), Mm(y), bold);
    layer.use_text("Unit Price", 11.0, Mm(COL_UNIT_PRICE_MM), Mm(y), bold);
    layer.use_text("Amount", 11.0, Mm(COL_AMOUNT_MM), Mm(y), bold);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, qty: i32, price: i64) -> InvoiceLine {
        InvoiceLine {
            name: name.to_string(),
            quantity: qty,
            unit_price: Decimal::new(price, 0),
        }
    }

    #[test]
    fn test_totals_apply_fifteen_percent_tax() {
        let lines = [line("Business Cards", 2, 100), line("Fliers", 1, 50)];
        let t = totals(&lines);
        assert_eq!(t.subtotal, Decimal::new(250, 0));
        assert_eq!(t.tax, Decimal::new(3750, 2));
        assert_eq!(t.total, Decimal::new(28750, 2));
    }

    #[test]
    fn test_totals_empty() {
        let t = totals(&[]);
        assert_eq!(t.subtotal, Decimal::ZERO);
        assert_eq!(t.total, Decimal::ZERO);
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let lines: Vec<InvoiceLine> = (0..65).map(|i| line(&format!("Item {i}"), 1, 10)).collect();
        let bytes = render("PrintCraft", "INV-0001", "2026-01-15", "AED", &lines).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_handles_exact_page_multiple() {
        let per_page: Vec<InvoiceLine> =
            (0..30).map(|i| line(&format!("Item {i}"), 1, 10)).collect();
        let bytes = render("PrintCraft", "INV-0002", "2026-01-15", "AED", &per_page).unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        // A short invoice keeps rows and footer on one page, so the
        // full-page render must carry strictly more content.
        let short: Vec<InvoiceLine> = (0..3).map(|i| line(&format!("Item {i}"), 1, 10)).collect();
        let short_bytes = render("PrintCraft", "INV-0003", "2026-01-15", "AED", &short).unwrap();
        assert!(bytes.len() > short_bytes.len());
    }
}
