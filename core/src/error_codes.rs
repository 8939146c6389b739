//! Stable error codes embedded in error display text.

pub const SNAP_ROOT_NOT_OBJECT: &str = "SNAPDIFF_SNAP_001";
pub const SNAP_PARSE: &str = "SNAPDIFF_SNAP_002";

pub const REG_MISSING_ID_FIELD: &str = "SNAPDIFF_REG_001";
pub const REG_ID_FIELD_ON_FLAT: &str = "SNAPDIFF_REG_002";
pub const REG_CHILDREN_ON_FLAT: &str = "SNAPDIFF_REG_003";
pub const REG_DUPLICATE_KEY: &str = "SNAPDIFF_REG_004";
pub const REG_PARSE: &str = "SNAPDIFF_REG_005";
