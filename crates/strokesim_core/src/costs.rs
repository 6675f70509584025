//! Acute and long-term care costs, rescaled to a common dollar year.
//!
//! Published cost figures come from different years, so each base constant
//! carries the USD year of its source and [`CostTable::inflated_to`] rescales
//! everything through the medical-care CPI. The table is a pure value:
//! building it for a year twice gives the same numbers, and no global state
//! is touched.

use serde::{Deserialize, Serialize};

/// Annual average CPI for medical care, 1982-84 = 100.
// Source: U.S. Bureau of Labor Statistics, series CUUR0000SAM
const MEDICAL_CPI: &[(u16, f64)] = &[
    (2005, 323.2),
    (2006, 336.2),
    (2007, 351.1),
    (2008, 364.1),
    (2009, 375.6),
    (2010, 388.4),
    (2011, 400.3),
    (2012, 414.9),
    (2013, 425.1),
    (2014, 435.3),
    (2015, 446.8),
    (2016, 463.7),
    (2017, 475.3),
    (2018, 484.7),
    (2019, 498.4),
    (2020, 518.9),
];

// Acute admission for ischemic stroke, before reperfusion therapy.
// Source: HCUP National Inpatient Sample
const ACUTE_ADMISSION: (f64, u16) = (9_100.0, 2016);

// Incremental cost of intravenous thrombolysis over supportive care.
// Source: Boudreau et al., J Stroke Cerebrovasc Dis 2014
const THROMBOLYSIS_INCREMENTAL: (f64, u16) = (13_419.0, 2014);

// Incremental index-hospitalization cost of endovascular thrombectomy.
// Source: Shireman et al., Stroke 2017 (SWIFT PRIME economic substudy)
const THROMBECTOMY_INCREMENTAL: (f64, u16) = (13_219.0, 2014);

// Terminal care for an in-hospital or early death.
const ACUTE_DEATH: (f64, u16) = (8_100.0, 2016);

// Annual care cost by modified Rankin grade 0 through 5.
// Source: Shireman et al., Stroke 2017; Joo et al., Am J Prev Med 2014
const ANNUAL_BY_MRS: ([f64; 6], u16) = ([2_130.0, 3_050.0, 5_510.0, 9_220.0, 14_360.0, 17_460.0], 2016);

fn cpi_for(year: u16) -> f64 {
    let mut best = MEDICAL_CPI[0];
    for &(y, cpi) in MEDICAL_CPI {
        if (i32::from(y) - i32::from(year)).abs() < (i32::from(best.0) - i32::from(year)).abs() {
            best = (y, cpi);
        }
    }
    best.1
}

fn rescale(amount: f64, from_year: u16, to_year: u16) -> f64 {
    // Ratio first, so rescaling into the source year is exact.
    amount * (cpi_for(to_year) / cpi_for(from_year))
}

/// All cost inputs expressed in the dollars of a single year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostTable {
    /// Dollar year every figure below is expressed in.
    pub year: u16,
    /// Acute stroke admission.
    pub admission: f64,
    /// Added by intravenous thrombolysis.
    pub thrombolysis: f64,
    /// Added by endovascular thrombectomy.
    pub thrombectomy: f64,
    /// One-time cost of death.
    pub death: f64,
    /// Yearly care cost for survivors, indexed by mRS grade 0-5.
    pub annual_by_mrs: [f64; 6],
}

impl CostTable {
    /// Build the table in `year` dollars from the published base figures.
    ///
    /// Years outside the CPI series use the nearest indexed year, so the
    /// rescaling is defined for any input. Calling this repeatedly with the
    /// same year always yields the same table.
    #[must_use]
    pub fn inflated_to(year: u16) -> Self {
        let (admission, admission_year) = ACUTE_ADMISSION;
        let (thrombolysis, tpa_year) = THROMBOLYSIS_INCREMENTAL;
        let (thrombectomy, evt_year) = THROMBECTOMY_INCREMENTAL;
        let (death, death_year) = ACUTE_DEATH;
        let (annual, annual_year) = ANNUAL_BY_MRS;

        Self {
            year,
            admission: rescale(admission, admission_year, year),
            thrombolysis: rescale(thrombolysis, tpa_year, year),
            thrombectomy: rescale(thrombectomy, evt_year, year),
            death: rescale(death, death_year, year),
            annual_by_mrs: annual.map(|c| rescale(c, annual_year, year)),
        }
    }
}
