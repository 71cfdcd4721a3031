// ── Domain model ──
//
// Vendor-neutral types handed to consumers. Nothing here knows about
// TR-069 parameter paths; that translation lives in `mapper`.

pub mod device;
pub mod wifi;

pub use device::{DeviceHandle, ParameterSnapshot, ParameterValue};
pub use wifi::{Band, BandConfig, ConnectedStation, WifiConfig};
