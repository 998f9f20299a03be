//! Static tables of PHP internal function names.
//!
//! The reference runtime asks the interpreter for its internal function list
//! at startup; a native tool ships the list instead. Coverage targets the
//! functions that actually show up in graded submissions — string, array,
//! math, I/O and type helpers. Names are stored lower-case; lookups fold
//! first (function names are case-insensitive).

use once_cell::sync::Lazy;
use rustc_hash::{FxHashMap, FxHashSet};

/// Internal functions that must never receive a synthetic token.
static BUILTIN_FUNCTION_NAMES: &[&str] = &[
    // String
    "addslashes",
    "bin2hex",
    "chr",
    "chunk_split",
    "explode",
    "htmlspecialchars",
    "implode",
    "lcfirst",
    "ltrim",
    "mb_str_split",
    "mb_strlen",
    "mb_strtolower",
    "mb_strtoupper",
    "mb_substr",
    "nl2br",
    "number_format",
    "ord",
    "preg_match",
    "preg_match_all",
    "preg_quote",
    "preg_replace",
    "preg_split",
    "printf",
    "rtrim",
    "sprintf",
    "sscanf",
    "str_contains",
    "str_ends_with",
    "str_pad",
    "str_repeat",
    "str_replace",
    "str_split",
    "str_starts_with",
    "str_word_count",
    "strcasecmp",
    "strcmp",
    "strlen",
    "strpos",
    "strrev",
    "strstr",
    "strtolower",
    "strtoupper",
    "strtr",
    "substr",
    "substr_count",
    "trim",
    "ucfirst",
    "ucwords",
    "vsprintf",
    "wordwrap",
    // Array
    "array_chunk",
    "array_column",
    "array_combine",
    "array_diff",
    "array_fill",
    "array_filter",
    "array_flip",
    "array_intersect",
    "array_key_exists",
    "array_key_first",
    "array_key_last",
    "array_keys",
    "array_map",
    "array_merge",
    "array_pad",
    "array_pop",
    "array_product",
    "array_push",
    "array_reduce",
    "array_reverse",
    "array_search",
    "array_shift",
    "array_slice",
    "array_splice",
    "array_sum",
    "array_unique",
    "array_unshift",
    "array_values",
    "array_walk",
    "arsort",
    "asort",
    "compact",
    "count",
    "current",
    "end",
    "extract",
    "in_array",
    "krsort",
    "ksort",
    "list",
    "natsort",
    "range",
    "reset",
    "rsort",
    "shuffle",
    "sort",
    "uasort",
    "uksort",
    "usort",
    // Math
    "abs",
    "base_convert",
    "bindec",
    "ceil",
    "cos",
    "decbin",
    "dechex",
    "decoct",
    "exp",
    "floor",
    "fmod",
    "hexdec",
    "intdiv",
    "log",
    "log10",
    "max",
    "min",
    "octdec",
    "pi",
    "pow",
    "rand",
    "random_int",
    "round",
    "sin",
    "sqrt",
    "tan",
    // Type checks and conversion
    "boolval",
    "floatval",
    "get_class",
    "gettype",
    "intval",
    "is_array",
    "is_bool",
    "is_callable",
    "is_float",
    "is_int",
    "is_null",
    "is_numeric",
    "is_object",
    "is_scalar",
    "is_string",
    "settype",
    "strval",
    // Variables, constants, functions
    "array_is_list",
    "constant",
    "define",
    "defined",
    "func_get_args",
    "func_num_args",
    "function_exists",
    "get_defined_vars",
    "isset",
    "method_exists",
    "property_exists",
    "unset",
    "var_dump",
    "var_export",
    // Output and environment
    "date",
    "error_log",
    "fclose",
    "feof",
    "fgets",
    "file",
    "file_exists",
    "file_get_contents",
    "file_put_contents",
    "fopen",
    "fread",
    "fwrite",
    "getenv",
    "microtime",
    "print",
    "print_r",
    "time",
    // JSON and serialization
    "json_decode",
    "json_encode",
    "serialize",
    "unserialize",
    // Misc
    "assert",
    "class_exists",
    "ini_get",
    "ini_set",
    "iterator_to_array",
    "spl_autoload_register",
    "usleep",
];

/// Deprecated spelling → canonical target. Calling an alias is represented as
/// a call to the target, and the pair is surfaced in the mapping export.
static FUNCTION_ALIAS_PAIRS: &[(&str, &str)] = &[
    ("chop", "rtrim"),
    ("diskfreespace", "disk_free_space"),
    ("doubleval", "floatval"),
    ("fputs", "fwrite"),
    ("ini_alter", "ini_set"),
    ("is_double", "is_float"),
    ("is_integer", "is_int"),
    ("is_long", "is_int"),
    ("is_real", "is_float"),
    ("join", "implode"),
    ("key_exists", "array_key_exists"),
    ("pos", "current"),
    ("show_source", "highlight_file"),
    ("sizeof", "count"),
    ("strchr", "strstr"),
];

static BUILTIN_FUNCTIONS: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    let mut set: FxHashSet<&'static str> = BUILTIN_FUNCTION_NAMES.iter().copied().collect();
    // Alias targets are builtins too, even when absent from the main list.
    for (alias, target) in FUNCTION_ALIAS_PAIRS {
        set.insert(alias);
        set.insert(target);
    }
    set
});

static FUNCTION_ALIASES: Lazy<FxHashMap<&'static str, &'static str>> =
    Lazy::new(|| FUNCTION_ALIAS_PAIRS.iter().copied().collect());

/// True when `folded_name` (already lower-cased) is an internal function.
pub fn is_builtin_function(folded_name: &str) -> bool {
    BUILTIN_FUNCTIONS.contains(folded_name)
}

/// Canonical target when `folded_name` is a deprecated alias.
pub fn resolve_alias(folded_name: &str) -> Option<&'static str> {
    FUNCTION_ALIASES.get(folded_name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_internal_functions() {
        assert!(is_builtin_function("strlen"));
        assert!(is_builtin_function("array_map"));
        assert!(!is_builtin_function("my_helper"));
    }

    #[test]
    fn aliases_resolve_to_builtins() {
        assert_eq!(resolve_alias("join"), Some("implode"));
        assert_eq!(resolve_alias("sizeof"), Some("count"));
        assert_eq!(resolve_alias("implode"), None);
        for (alias, target) in FUNCTION_ALIAS_PAIRS {
            assert!(is_builtin_function(alias), "{alias} must be a builtin");
            assert!(is_builtin_function(target), "{target} must be a builtin");
        }
    }
}
