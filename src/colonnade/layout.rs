//! Colonnade Layouts
//!
//! The structure is described by fixed placement tables, not generated by a
//! rule. Segment boundaries, radii and beam sizes were tuned by hand so that
//! stacked frustums approximate an entasis profile; they are reproduced here
//! value for value and kept as named data so they can be audited on their
//! own.
//!
//! Each layout variant is an independent pure function producing an ordered
//! [`LayoutPlan`]. Nothing here touches a world.
//!
//! # Naming
//!
//! - `ground`, `table`
//! - `row{r}.col{c}.pedestal`, `row{r}.col{c}.seg{s}`, `row{r}.col{c}.capital`
//! - `row{r}.col{c}.upper.seg{s}`, `row{r}.col{c}.upper.capital` (second tier)
//! - `row{r}.beam{b}`, `row{r}.top_beam{b}` (beam `b` spans columns `b` and `b + 1`)

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{ElementRole, GeometryError, SolidRequest, SolidShape, TaperedColumnSpec};
use crate::physics::{Pose, Vec3};

// ============================================================================
// SHARED CONSTANTS
// ============================================================================

/// Facets around each column segment.
pub const COLUMN_EDGES: u32 = 100;

/// Stone density (kg/m³).
pub const STONE_DENSITY: f64 = 3000.0;

/// Fixed floor: full size and center.
pub const GROUND_SIZE: Vec3 = Vec3::new(20.0, 2.0, 20.0);
pub const GROUND_CENTER: Vec3 = Vec3::new(0.0, -2.0, 0.0);

/// Shake table: full size and center. Its top face is y = 0.
pub const TABLE_SIZE: Vec3 = Vec3::new(15.0, 1.0, 15.0);
pub const TABLE_CENTER: Vec3 = Vec3::new(0.0, -0.5, 0.0);

pub const GROUND_NAME: &str = "ground";
pub const TABLE_NAME: &str = "table";

// ============================================================================
// TABLE ROW TYPES
// ============================================================================

/// One frustum of a column stack, at an absolute base height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentRow {
    pub base_y: f64,
    pub height: f64,
    pub radius_bottom: f64,
    pub radius_top: f64,
}

const fn seg(base_y: f64, height: f64, radius_bottom: f64, radius_top: f64) -> SegmentRow {
    SegmentRow {
        base_y,
        height,
        radius_bottom,
        radius_top,
    }
}

/// A box block sitting on `base_y`, centered on the column axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockRow {
    pub base_y: f64,
    pub size: Vec3,
}

/// Beams between adjacent columns. Length is the column spacing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamRow {
    pub base_y: f64,
    pub height: f64,
    pub depth: f64,
}

/// One storey of a column: optional pedestal, the segment stack, optional
/// capital, optional beams to the next column.
#[derive(Debug, Clone, Copy)]
pub struct TierRow {
    /// Name prefix inside the column, empty for the ground storey
    pub prefix: &'static str,
    pub pedestal: Option<BlockRow>,
    pub segments: &'static [SegmentRow],
    pub capital: Option<BlockRow>,
    pub beam: Option<BeamRow>,
    /// Beam name stem, e.g. `beam` or `top_beam`
    pub beam_name: &'static str,
}

/// A straight row of identical columns at constant z.
#[derive(Debug, Clone, Copy)]
pub struct ColonnadeRow {
    pub z: f64,
    pub tiers: &'static [TierRow],
}

// ============================================================================
// SIMPLE LAYOUT TABLE
// ============================================================================

/// Three columns per row, one meter apart.
pub const SIMPLE_COLUMNS: usize = 3;
pub const SIMPLE_SPACING: f64 = 1.0;

/// Rows at z = 0, 2, 4 with 1.0, 1.5 and 2.0 m segments; beams over the
/// first and last rows only.
pub const SIMPLE_ROWS: [ColonnadeRow; 3] = [
    ColonnadeRow {
        z: 0.0,
        tiers: &[TierRow {
            prefix: "",
            pedestal: None,
            segments: &[
                seg(0.0, 1.0, 0.50, 0.45),
                seg(1.0, 1.0, 0.45, 0.40),
                seg(2.0, 1.0, 0.40, 0.35),
            ],
            capital: None,
            beam: Some(BeamRow {
                base_y: 3.0,
                height: 0.4,
                depth: 0.6,
            }),
            beam_name: "beam",
        }],
    },
    ColonnadeRow {
        z: 2.0,
        tiers: &[TierRow {
            prefix: "",
            pedestal: None,
            segments: &[
                seg(0.0, 1.5, 0.50, 0.45),
                seg(1.5, 1.5, 0.45, 0.40),
                seg(3.0, 1.5, 0.40, 0.35),
            ],
            capital: None,
            beam: None,
            beam_name: "beam",
        }],
    },
    ColonnadeRow {
        z: 4.0,
        tiers: &[TierRow {
            prefix: "",
            pedestal: None,
            segments: &[
                seg(0.0, 2.0, 0.50, 0.45),
                seg(2.0, 2.0, 0.45, 0.40),
                seg(4.0, 2.0, 0.40, 0.35),
            ],
            capital: None,
            beam: Some(BeamRow {
                base_y: 6.0,
                height: 1.4,
                depth: 0.6,
            }),
            beam_name: "beam",
        }],
    },
];

// ============================================================================
// EXTENDED LAYOUT TABLE
// ============================================================================

/// Four columns, 1.2 m apart, two storeys.
pub const EXTENDED_COLUMNS: usize = 4;
pub const EXTENDED_SPACING: f64 = 1.2;

pub const EXTENDED_ROWS: [ColonnadeRow; 1] = [ColonnadeRow {
    z: 0.0,
    tiers: &[
        TierRow {
            prefix: "",
            pedestal: Some(BlockRow {
                base_y: 0.0,
                size: Vec3::new(0.9, 0.3, 0.9),
            }),
            segments: &[
                seg(0.3, 1.0, 0.40, 0.38),
                seg(1.3, 1.0, 0.38, 0.35),
                seg(2.3, 1.0, 0.35, 0.32),
            ],
            capital: Some(BlockRow {
                base_y: 3.3,
                size: Vec3::new(0.8, 0.25, 0.8),
            }),
            beam: Some(BeamRow {
                base_y: 3.55,
                height: 0.35,
                depth: 0.6,
            }),
            beam_name: "beam",
        },
        TierRow {
            prefix: "upper.",
            pedestal: None,
            segments: &[seg(3.9, 0.8, 0.25, 0.23), seg(4.7, 0.8, 0.23, 0.21)],
            capital: Some(BlockRow {
                base_y: 5.5,
                size: Vec3::new(0.55, 0.2, 0.55),
            }),
            beam: Some(BeamRow {
                base_y: 5.7,
                height: 0.3,
                depth: 0.5,
            }),
            beam_name: "top_beam",
        },
    ],
}];

// ============================================================================
// PLAN
// ============================================================================

/// Which structure to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutVariant {
    /// Three columns per row, three rows
    #[default]
    Simple,
    /// Four columns with a second tier of slender columns and capitals
    Extended,
}

impl LayoutVariant {
    /// Build this variant's plan.
    pub fn build(self) -> Result<LayoutPlan, GeometryError> {
        match self {
            LayoutVariant::Simple => simple_layout(),
            LayoutVariant::Extended => extended_layout(),
        }
    }
}

impl fmt::Display for LayoutVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutVariant::Simple => f.write_str("simple"),
            LayoutVariant::Extended => f.write_str("extended"),
        }
    }
}

/// Ordered list of solids making up one structure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutPlan {
    pub variant: LayoutVariant,
    pub requests: Vec<SolidRequest>,
    /// Elements logged by default
    pub monitored: Vec<String>,
}

impl LayoutPlan {
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&SolidRequest> {
        self.requests.iter().find(|r| r.name == name)
    }

    pub fn count_role(&self, role: ElementRole) -> usize {
        self.requests.iter().filter(|r| r.role == role).count()
    }

    /// Column segment specs in plan order.
    pub fn column_specs(&self) -> impl Iterator<Item = &TaperedColumnSpec> {
        self.requests.iter().filter_map(|r| match &r.shape {
            SolidShape::Column(spec) => Some(spec),
            _ => None,
        })
    }
}

// ============================================================================
// LAYOUT FUNCTIONS
// ============================================================================

/// Three rows of three columns on the shake table.
pub fn simple_layout() -> Result<LayoutPlan, GeometryError> {
    let mut requests = support_requests();
    for (r, row) in SIMPLE_ROWS.iter().enumerate() {
        push_row(&mut requests, r, row, SIMPLE_COLUMNS, SIMPLE_SPACING)?;
    }
    Ok(LayoutPlan {
        variant: LayoutVariant::Simple,
        requests,
        monitored: vec!["row0.beam0".to_string(), "row2.beam0".to_string()],
    })
}

/// One row of four two-storey columns on pedestals.
pub fn extended_layout() -> Result<LayoutPlan, GeometryError> {
    let mut requests = support_requests();
    for (r, row) in EXTENDED_ROWS.iter().enumerate() {
        push_row(&mut requests, r, row, EXTENDED_COLUMNS, EXTENDED_SPACING)?;
    }
    Ok(LayoutPlan {
        variant: LayoutVariant::Extended,
        requests,
        monitored: vec![
            "row0.beam1".to_string(),
            "row0.col0.upper.capital".to_string(),
            "row0.top_beam1".to_string(),
        ],
    })
}

/// Floor and shake table, common to every layout.
fn support_requests() -> Vec<SolidRequest> {
    vec![
        SolidRequest::cuboid(
            GROUND_NAME,
            ElementRole::Ground,
            GROUND_SIZE,
            STONE_DENSITY,
            GROUND_CENTER,
        )
        .fixed()
        .without_collision(),
        SolidRequest::cuboid(
            TABLE_NAME,
            ElementRole::ShakeTable,
            TABLE_SIZE,
            STONE_DENSITY,
            TABLE_CENTER,
        ),
    ]
}

fn push_row(
    requests: &mut Vec<SolidRequest>,
    r: usize,
    row: &ColonnadeRow,
    columns: usize,
    spacing: f64,
) -> Result<(), GeometryError> {
    for tier in row.tiers {
        for c in 0..columns {
            let x = c as f64 * spacing;
            let column = format!("row{r}.col{c}.{}", tier.prefix);

            if let Some(block) = tier.pedestal {
                let name = format!("{column}pedestal");
                requests.push(block_request(name, ElementRole::Pedestal, block, x, row.z));
            }
            for (s, segment) in tier.segments.iter().enumerate() {
                let spec = TaperedColumnSpec::new(
                    COLUMN_EDGES,
                    segment.radius_top,
                    segment.radius_bottom,
                    segment.height,
                    STONE_DENSITY,
                    Pose::from_xyz(x, segment.base_y, row.z),
                )?;
                requests.push(SolidRequest::column(format!("{column}seg{s}"), spec));
            }
            if let Some(block) = tier.capital {
                let name = format!("{column}capital");
                requests.push(block_request(name, ElementRole::Capital, block, x, row.z));
            }
        }

        if let Some(beam) = tier.beam {
            for b in 0..columns.saturating_sub(1) {
                let center = Vec3::new(
                    b as f64 * spacing + spacing / 2.0,
                    beam.base_y + beam.height / 2.0,
                    row.z,
                );
                requests.push(SolidRequest::cuboid(
                    format!("row{r}.{}{b}", tier.beam_name),
                    ElementRole::Beam,
                    Vec3::new(spacing, beam.height, beam.depth),
                    STONE_DENSITY,
                    center,
                ));
            }
        }
    }
    Ok(())
}

fn block_request(name: String, role: ElementRole, block: BlockRow, x: f64, z: f64) -> SolidRequest {
    let center = Vec3::new(x, block.base_y + block.size.y / 2.0, z);
    SolidRequest::cuboid(name, role, block.size, STONE_DENSITY, center)
}
