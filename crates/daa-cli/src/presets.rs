//! Named parameter presets selectable from the command line.

use clap::ValueEnum;
use daa_core::{AlertLevels, KinematicBandsParameters};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// SC-228 preventive, corrective and warning levels
    #[default]
    #[value(name = "wc-sc-228")]
    WcSc228,
    /// SC-228 levels with buffered volumes and kinematic bands
    #[value(name = "buffered-wc-sc-228")]
    BufferedWcSc228,
    /// One NEAR level with the SC-228 corrective volume
    #[value(name = "single-bands-wc-sc-228")]
    SingleBandsWcSc228,
}

impl Preset {
    pub fn parameters(self) -> KinematicBandsParameters {
        match self {
            Preset::WcSc228 => KinematicBandsParameters::wc_sc_228_mops(),
            Preset::BufferedWcSc228 => KinematicBandsParameters::buffered_wc_sc_228_mops(true),
            Preset::SingleBandsWcSc228 => {
                let mut params = KinematicBandsParameters::wc_sc_228_mops();
                params.set_alertor(AlertLevels::single_bands_wc_sc_228());
                params
            }
        }
    }
}
