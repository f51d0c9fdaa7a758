//! Role-to-style table applied by the workbook renderer.

use umya_spreadsheet::{Border, HorizontalAlignmentValues, Style, VerticalAlignmentValues};

use crate::layout::{CellRole, PlacedCell};

/// ARGB fill of header cells.
pub const HEADER_FILL: &str = "FF4F81BD";
/// ARGB font color of header cells.
pub const HEADER_FONT: &str = "FFFFFFFF";
/// ARGB fill of banded rows.
pub const BAND_FILL: &str = "FFD9D9D9";

/// Visual attributes derived from a [`CellRole`] and the band flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellStyle {
    pub bold: bool,
    pub font_color: Option<&'static str>,
    pub fill: Option<&'static str>,
    pub thin_border: bool,
    pub centered: bool,
}

impl CellStyle {
    pub fn for_cell(cell: &PlacedCell) -> Self {
        let mut style = match cell.role {
            CellRole::TableHeader => Self {
                thin_border: true,
                ..Self::header()
            },
            CellRole::SideHeader | CellRole::SummaryHeader => Self::header(),
            CellRole::TableData => Self {
                thin_border: true,
                centered: true,
                ..Self::default()
            },
            CellRole::SideEntry | CellRole::SummaryValue => Self::default(),
        };
        if cell.banded {
            style.fill = Some(BAND_FILL);
        }
        style
    }

    fn header() -> Self {
        Self {
            bold: true,
            font_color: Some(HEADER_FONT),
            fill: Some(HEADER_FILL),
            ..Self::default()
        }
    }

    /// True when nothing would change on the target cell.
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, target: &mut Style) {
        if self.bold {
            target.get_font_mut().set_bold(true);
        }
        if let Some(argb) = self.font_color {
            target.get_font_mut().get_color_mut().set_argb(argb);
        }
        if let Some(argb) = self.fill {
            target.set_background_color(argb);
        }
        if self.thin_border {
            let borders = target.get_borders_mut();
            borders.get_left_mut().set_border_style(Border::BORDER_THIN);
            borders.get_right_mut().set_border_style(Border::BORDER_THIN);
            borders.get_top_mut().set_border_style(Border::BORDER_THIN);
            borders.get_bottom_mut().set_border_style(Border::BORDER_THIN);
        }
        if self.centered {
            let alignment = target.get_alignment_mut();
            alignment.set_horizontal(HorizontalAlignmentValues::Center);
            alignment.set_vertical(VerticalAlignmentValues::Center);
        }
    }
}
