// src/macros.rs

/// Owned `String` from anything `String: From` accepts.
/// `s!()` is empty; `s!("{} of {}", a, b)` formats.
#[macro_export]
macro_rules! s {
    () => {
        ::std::string::String::new()
    };
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
    ($fmt:literal, $($arg:tt)+) => {
        ::std::format!($fmt, $($arg)+)
    };
}

/// Concatenate string slices into one `String`, e.g. a file name:
/// `join!(stem, ".csv")`.
#[macro_export]
macro_rules! join {
    ($first:expr $(, $rest:expr)+ $(,)?) => {{
        let mut out = ::std::string::String::from($first);
        $( out.push_str($rest); )+
        out
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn shorthand() {
        assert_eq!(s!(), "");
        assert_eq!(s!("rock"), "rock");
        assert_eq!(s!("{}/{}", 3, 10), "3/10");
        assert_eq!(join!("abc", "-", "def", ".csv"), "abc-def.csv");
    }
}
