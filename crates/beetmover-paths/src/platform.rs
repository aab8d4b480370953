//! Build-system platform names to release path platform names.

/// Stage platform -> platform segment used in release paths.
const STAGE_PLATFORM_MAP: &[(&str, &str)] = &[
    ("linux", "linux-i686"),
    ("linux-devedition", "linux-i686"),
    ("linux64", "linux-x86_64"),
    ("linux64-asan-reporter", "linux-x86_64-asan-reporter"),
    ("linux64-devedition", "linux-x86_64"),
    ("macosx64", "mac"),
    ("macosx64-devedition", "mac"),
    ("win32-devedition", "win32"),
    ("win64-devedition", "win64"),
];

/// Extra names used only in file names, checked after [`STAGE_PLATFORM_MAP`].
const FILENAME_PLATFORM_MAP: &[(&str, &str)] = &[
    ("android", "android-arm"),
    ("android-api-15", "android-arm"),
    ("android-api-16", "android-arm"),
    ("android-x86", "android-i386"),
    ("win32", "win32"),
    ("win64", "win64"),
];

fn lookup(table: &[(&'static str, &'static str)], name: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(from, _)| *from == name)
        .map(|(_, to)| *to)
}

/// Platform directory name for a stage platform; unknown names pass through.
pub fn stage_platform_name(stage_platform: &str) -> String {
    lookup(STAGE_PLATFORM_MAP, stage_platform)
        .unwrap_or(stage_platform)
        .to_string()
}

/// Platform label embedded in artifact file names.
pub fn filename_platform(stage_platform: &str) -> String {
    lookup(STAGE_PLATFORM_MAP, stage_platform)
        .or_else(|| lookup(FILENAME_PLATFORM_MAP, stage_platform))
        .unwrap_or(stage_platform)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_platform_known() {
        assert_eq!(stage_platform_name("linux64"), "linux-x86_64");
        assert_eq!(stage_platform_name("macosx64-devedition"), "mac");
    }

    #[test]
    fn test_stage_platform_android_unchanged() {
        // Android stage names are only rewritten in file names
        assert_eq!(stage_platform_name("android-api-15"), "android-api-15");
    }

    #[test]
    fn test_filename_platform() {
        assert_eq!(filename_platform("android-api-15"), "android-arm");
        assert_eq!(filename_platform("android-x86"), "android-i386");
        assert_eq!(filename_platform("linux"), "linux-i686");
        assert_eq!(filename_platform("win64"), "win64");
    }

    #[test]
    fn test_unknown_platform_passthrough() {
        assert_eq!(filename_platform("beos"), "beos");
        assert_eq!(stage_platform_name("beos"), "beos");
    }
}
