//! Visual identity of every tracked airline.
//!
//! A company without an entry here is an onboarding gap, so lookups fail
//! with `AppError::UnknownCompany` instead of falling back to a default color.

use crate::error::{AppError, Result};

/// Number of link colors per company; the Sankey view has at most 8 edges.
pub const LINK_COLORS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompanyPalette {
    pub company: &'static str,
    /// Line, polygon and bar color.
    pub identity: &'static str,
    /// Sankey edge colors, applied to edges in declaration order.
    pub links: [&'static str; LINK_COLORS],
}

pub const PALETTES: &[CompanyPalette] = &[
    CompanyPalette {
        company: "Spirit",
        identity: "#FFD966",
        links: [
            "#EAC100", "#FFD306", "#FFDC35", "#FFE153", "#FFE66F", "#FFED97", "#FFF0AC", "#FFF4C1",
        ],
    },
    CompanyPalette {
        company: "Sky West",
        identity: "#E06666",
        links: [
            "#8C4646", "#A65252", "#BF6A6A", "#D28484", "#E1A3A3", "#EBC3C3", "#F5DCDC", "#FAEAEA",
        ],
    },
    CompanyPalette {
        company: "JetBlue",
        identity: "#5B9BD5",
        links: [
            "#004B97", "#005AB5", "#0066CC", "#0072E3", "#0080FF", "#2894FF", "#46A3FF", "#66B3FF",
        ],
    },
    CompanyPalette {
        company: "Hawaiian",
        identity: "#9E91C9",
        links: [
            "#5151A2", "#5A5AAD", "#7373B9", "#8080C0", "#9999CC", "#A6A6D2", "#B8B8DC", "#C7C7E2",
        ],
    },
    CompanyPalette {
        company: "Frontier",
        identity: "#A8D08D",
        links: [
            "#4C8A4C", "#426D54", "#5A8559", "#639E63", "#719A5E", "#7AB27A", "#91C791", "#A9DBA9",
        ],
    },
];

pub fn palette_for(company: &str) -> Result<&'static CompanyPalette> {
    PALETTES
        .iter()
        .find(|p| p.company == company)
        .ok_or_else(|| AppError::UnknownCompany(company.to_string()))
}

pub fn identity_color(company: &str) -> Result<&'static str> {
    palette_for(company).map(|p| p.identity)
}

/// Fails on the first company that has no palette.
pub fn ensure_palettes<'a>(companies: impl IntoIterator<Item = &'a str>) -> Result<()> {
    companies.into_iter().try_for_each(|c| palette_for(c).map(|_| ()))
}
