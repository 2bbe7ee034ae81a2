/// Fixed column names of a match table, in output order
/// Experiment of the query peak (empty for point searches)
pub const MTAB_EXP: &str = "mtab_exp";
/// Query m/z
pub const MTAB_MZ: &str = "mtab_mz";
/// Query retention time
pub const MTAB_RT: &str = "mtab_rt";
/// Query annotation
pub const MTAB_ANNOTATION: &str = "mtab_annotation";
/// Experiment of the matched peak
pub const MATCH_EXP: &str = "match_exp";
/// Matched m/z
pub const MATCH_MZ: &str = "match_mz";
/// Matched retention time
pub const MATCH_RT: &str = "match_rt";
/// Matched annotation
pub const MATCH_ANNOTATION: &str = "match_annotation";
/// Sample name
pub const SAMPLE: &str = "sample";
/// Intensity of the matched peak in the sample
pub const INTENSITY: &str = "intensity";
/// `1` for control samples, `0` otherwise
pub const CONTROL: &str = "control";

/// All fixed columns in order
pub const FIXED_COLUMNS: [&str; 11] = [
    MTAB_EXP,
    MTAB_MZ,
    MTAB_RT,
    MTAB_ANNOTATION,
    MATCH_EXP,
    MATCH_MZ,
    MATCH_RT,
    MATCH_ANNOTATION,
    SAMPLE,
    INTENSITY,
    CONTROL,
];
