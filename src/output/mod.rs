pub mod formatter;

pub use formatter::{
    format_exclusions, format_json, format_ranked_table, format_region_detail, format_rescaled,
    format_score, format_tsv, format_weights, should_use_colors,
};
