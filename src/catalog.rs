//! Static dataset catalog
//!
//! Every dataset this crate knows how to fetch is a `&'static DatasetSpec`
//! defined here. Nothing is constructed from user input.

use serde::Serialize;
use std::path::Path;

/// How a downloaded resource is packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArchiveKind {
    None,
    TarGz,
    Zip,
}

/// One remote file and where it lands under the data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resource {
    pub name: &'static str,
    pub url: &'static str,
    /// Destination relative to the data directory
    pub file: &'static str,
}

/// Which paths a fetch hands back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "pattern")]
pub enum ArtifactSelector {
    /// The resource destinations, in declared order
    Resources,
    /// Files matching a glob relative to the data directory, sorted
    Glob(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasetSpec {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub resources: &'static [Resource],
    pub archive: ArchiveKind,
    /// Directory whose presence means the archive has been extracted.
    /// `None` leaves the archive packed.
    pub extract_marker: Option<&'static str>,
    pub artifact: ArtifactSelector,
    /// Print the description before fetching
    pub announce: bool,
}

impl DatasetSpec {
    /// Whether this spec unpacks its archive after download
    pub fn extracts(&self) -> bool {
        self.archive != ArchiveKind::None && self.extract_marker.is_some()
    }

    /// True when every resource exists under `data_dir` and, for archives,
    /// the extraction marker does too.
    pub fn is_present_in(&self, data_dir: &Path) -> bool {
        let resources_present = self
            .resources
            .iter()
            .all(|r| data_dir.join(r.file).exists());
        let extracted = match self.extract_marker {
            Some(marker) if self.extracts() => data_dir.join(marker).exists(),
            _ => true,
        };
        resources_present && extracted
    }
}

pub const ELECTRICITY: DatasetSpec = DatasetSpec {
    name: "electricity",
    title: "Individual household electric power consumption",
    description: "\
2075259 measurements gathered in a house located in Sceaux (7km of Paris, France)
between December 2006 and November 2010 (47 months), one sample per minute.

(global_active_power*1000/60 - sub_metering_1 - sub_metering_2 - sub_metering_3)
is the active energy consumed every minute (in watt hour) by electrical equipment
not measured in sub-meterings 1, 2 and 3. Nearly 1.25% of the rows have missing
measurement values, represented by an empty field between two semicolons.

Attributes:
  date                   dd/mm/yyyy
  time                   hh:mm:ss
  global_active_power    minute-averaged active power (kilowatt)
  global_reactive_power  minute-averaged reactive power (kilowatt)
  voltage                minute-averaged voltage (volt)
  global_intensity       minute-averaged current intensity (ampere)
  sub_metering_1         kitchen: dishwasher, oven, microwave (watt-hour)
  sub_metering_2         laundry: washing-machine, tumble-drier, refrigerator, light (watt-hour)
  sub_metering_3         electric water-heater and air-conditioner (watt-hour)",
    resources: &[Resource {
        name: "household_power_consumption",
        url: "https://archive.ics.uci.edu/ml/machine-learning-databases/00235/household_power_consumption.zip",
        file: "household_power_consumption.zip",
    }],
    archive: ArchiveKind::Zip,
    extract_marker: None,
    artifact: ArtifactSelector::Resources,
    announce: true,
};

macro_rules! au_appliance {
    ($name:literal, $resource:literal, $file:literal) => {
        Resource {
            name: $name,
            url: concat!(
                "https://data.gov.au/data/dataset/559708e5-480e-4f94-8429-c49571e82761/resource/",
                $resource,
                "/download/",
                $file
            ),
            file: concat!("Australian-Electrical-Appliances/", $name, ".csv"),
        }
    };
}

pub const APPLIANCES: DatasetSpec = DatasetSpec {
    name: "appliances",
    title: "Australian electrical appliance energy ratings",
    description: "Registered energy-rating data for seven classes of household appliances \
from the Australian Government open data portal (data.gov.au), one CSV per class.",
    resources: &[
        au_appliance!(
            "AirConditioners",
            "0973a476-eb0c-45e6-9a18-054f74307843",
            "tmpxdamix_ac_2019_03_17.csv"
        ),
        au_appliance!(
            "Clothes-dryers",
            "f734c56b-a255-4c4e-a3c1-e835c38b8774",
            "tmpcf_j7j_cd_2019_03_17.csv"
        ),
        au_appliance!(
            "Dishwashers",
            "cbe7057d-e132-4297-b8be-eecf8322d4e6",
            "tmp9jiwbq_dw_2019_03_17.csv"
        ),
        au_appliance!(
            "Clothes-Washers",
            "eb3b9d8e-f39d-47b7-9db0-309856176951",
            "tmpxjwy19_cw_2019_03_17.csv"
        ),
        au_appliance!(
            "Fridges-and-Freezers",
            "0eabca18-49bb-4a9e-8019-28d5d56501c4",
            "tmp0sld1e_rf_2019_03_17.csv"
        ),
        au_appliance!(
            "Televisions",
            "93a615e5-935e-4713-a4b0-379e3f6dedc9",
            "tmplhf9bo_tv_2019_03_17.csv"
        ),
        au_appliance!(
            "Computer-monitors",
            "f1ea4c89-282c-4d64-b870-10a5ab039030",
            "tmp2gwicy_mo_2019_03_17.csv"
        ),
    ],
    archive: ArchiveKind::None,
    extract_marker: None,
    artifact: ArtifactSelector::Resources,
    announce: false,
};

pub const FLIGHTS: DatasetSpec = DatasetSpec {
    name: "flights",
    title: "NYC flights",
    description: "Departures from the New York City airports, one CSV per year, \
as published for the dask tutorial.",
    resources: &[Resource {
        name: "nycflights",
        url: "https://storage.googleapis.com/dask-tutorial-data/nycflights.tar.gz",
        file: "nycflights.tar.gz",
    }],
    archive: ArchiveKind::TarGz,
    extract_marker: Some("nycflights"),
    artifact: ArtifactSelector::Glob("nycflights/*.csv"),
    announce: false,
};

pub const WAVES: DatasetSpec = DatasetSpec {
    name: "waves",
    title: "Coastal data system - waves (Mooloolaba)",
    description: "\
Measured and derived wave parameters from the oceanographic wave buoy anchored at
Mooloolaba, Queensland (https://www.data.qld.gov.au/dataset/coastal-data-system-waves-mooloolaba).

Fields:
  Date/Time     date
  Hs            significant wave height (mean of the highest third, 26.6 minute record)
  Hmax          maximum wave height in the record
  Tz            zero upcrossing wave period
  Tp            peak energy wave period
  Dir_Tp TRUE   direction (true north) the peak period waves come from
  SST           approximate sea surface temperature",
    resources: &[Resource {
        name: "waves",
        url: "http://www.ehp.qld.gov.au/data-sets/waves/mooloolaba/mooloolaba_200004200000-201412312350.csv",
        file: "waves.csv",
    }],
    archive: ArchiveKind::None,
    extract_marker: None,
    artifact: ArtifactSelector::Resources,
    announce: false,
};

static CATALOG: [&DatasetSpec; 4] = [&ELECTRICITY, &APPLIANCES, &FLIGHTS, &WAVES];

/// Dataset fetched when no name is given
pub const DEFAULT_DATASET: &str = "electricity";

/// Every known dataset, in catalog order
pub fn all() -> &'static [&'static DatasetSpec] {
    &CATALOG
}

/// Look a dataset up by name
pub fn find(name: &str) -> Option<&'static DatasetSpec> {
    CATALOG.iter().copied().find(|spec| spec.name == name)
}
