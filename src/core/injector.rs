use crate::domain::model::{MetadataBlock, CLOSING_SENTINEL, OPENING_SENTINEL};
use regex::Regex;
use std::sync::LazyLock;

static CODING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t\f]*#.*?coding[:=][ \t]*([-_.a-zA-Z0-9]+)")
        .expect("encoding pattern is valid")
});

/// Writes `block` into `source`.
///
/// An existing block (first `# /// script` line and the first `# ///` line
/// after it) is swapped in place. Otherwise the block goes to the top of the
/// file, below a shebang and/or encoding declaration, followed by one blank
/// line.
pub fn inject_metadata(source: &str, block: &MetadataBlock) -> String {
    let mut lines: Vec<&str> = source.split_inclusive('\n').collect();
    let formatted: Vec<String> = block
        .lines()
        .iter()
        .map(|line| format!("{}\n", line))
        .collect();

    let spliced: Vec<String> = match find_existing_block(&lines) {
        Some((start, end)) => {
            tracing::debug!("Replacing existing metadata block at lines {}..={}", start, end);
            let mut out: Vec<String> = lines[..start].iter().map(|l| l.to_string()).collect();
            out.extend(formatted);
            out.extend(lines[end + 1..].iter().map(|l| l.to_string()));
            out
        }
        None => {
            let at = insertion_index(&lines);
            tracing::debug!("Inserting new metadata block at line {}", at);
            let tail = lines.split_off(at);
            let mut out: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
            // A shebang or coding line at end of file has no terminator yet.
            if out.last().is_some_and(|last| !last.ends_with('\n')) {
                out.push("\n".to_string());
            }
            out.extend(formatted);
            out.push("\n".to_string());
            out.extend(tail.iter().map(|l| l.to_string()));
            out
        }
    };

    spliced.concat()
}

fn find_existing_block(lines: &[&str]) -> Option<(usize, usize)> {
    let start = lines.iter().position(|line| line.trim() == OPENING_SENTINEL)?;
    let end = lines[start + 1..]
        .iter()
        .position(|line| line.trim() == CLOSING_SENTINEL)?;
    Some((start, start + 1 + end))
}

pub fn is_encoding_declaration(line: &str) -> bool {
    CODING_RE.is_match(line)
}

fn insertion_index(lines: &[&str]) -> usize {
    let Some(first) = lines.first() else {
        return 0;
    };

    if first.starts_with("#!") {
        match lines.get(1) {
            Some(second) if is_encoding_declaration(second) => 2,
            _ => 1,
        }
    } else if is_encoding_declaration(first) {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OLD: &str = "# /// script\n\
                       # requires-python = \">=3.8\"\n\
                       # dependencies = [\n\
                       #     \"requests==2.31.0\",\n\
                       # ]\n\
                       # ///";
    const NEW: &str = "# /// script\n\
                       # requires-python = \">=3.8\"\n\
                       # dependencies = [\n\
                       #     \"requests==2.32.0\",\n\
                       # ]\n\
                       # ///";

    fn minimal() -> MetadataBlock {
        MetadataBlock::parse("# /// script\n# ///")
    }

    #[test]
    fn test_inject_simple() {
        let injected = inject_metadata("import requests\nprint('hello')", &minimal());
        assert_eq!(injected, "# /// script\n# ///\n\nimport requests\nprint('hello')");
    }

    #[test]
    fn test_inject_into_empty_source() {
        assert_eq!(inject_metadata("", &minimal()), "# /// script\n# ///\n\n");
    }

    #[test]
    fn test_inject_replace_existing() {
        let code = format!("{}\nimport requests\nprint('hello')", OLD);

        let result = inject_metadata(&code, &MetadataBlock::parse(NEW));

        assert!(result.contains(NEW));
        assert!(!result.contains(OLD));
        assert_eq!(result, format!("{}\nimport requests\nprint('hello')", NEW));
        assert_eq!(result.matches("# /// script").count(), 1);
    }

    #[test]
    fn test_inject_replace_with_shebang() {
        let shebang = "#!/usr/bin/env python3\n";
        let code = format!("{}{}\nimport requests", shebang, OLD);

        let result = inject_metadata(&code, &MetadataBlock::parse(NEW));

        assert!(result.starts_with(shebang));
        assert!(result.contains(NEW));
        assert!(!result.contains("requests==2.31.0"));
        assert_eq!(result.matches("# /// script").count(), 1);
    }

    #[test]
    fn test_inject_preserve_shebang() {
        let injected = inject_metadata("#!/usr/bin/env python3\nimport os", &minimal());
        let lines: Vec<&str> = injected.lines().collect();
        assert_eq!(lines[0], "#!/usr/bin/env python3");
        assert_eq!(lines[1], "# /// script");
    }

    #[test]
    fn test_inject_preserve_encoding() {
        let injected = inject_metadata("# -*- coding: utf-8 -*-\nimport requests", &minimal());
        let lines: Vec<&str> = injected.lines().collect();
        assert!(lines[0].starts_with("# -*- coding"));
        assert_eq!(lines[1], "# /// script");
    }

    #[test]
    fn test_inject_preserve_shebang_and_encoding() {
        let code = "#!/usr/bin/env python3\n# vim: set fileencoding=latin-1 :\nimport requests";
        let injected = inject_metadata(code, &minimal());
        let lines: Vec<&str> = injected.lines().collect();
        assert_eq!(lines[0], "#!/usr/bin/env python3");
        assert_eq!(lines[1], "# vim: set fileencoding=latin-1 :");
        assert_eq!(lines[2], "# /// script");
    }

    #[test]
    fn test_shebang_without_newline_stays_on_its_own_line() {
        let injected = inject_metadata("#!/usr/bin/env python3", &minimal());
        assert_eq!(injected, "#!/usr/bin/env python3\n# /// script\n# ///\n\n");

        let again = inject_metadata(&injected, &minimal());
        assert_eq!(again, injected);
    }

    #[test]
    fn test_encoding_without_newline_stays_on_its_own_line() {
        let injected = inject_metadata("# -*- coding: utf-8 -*-", &minimal());
        assert_eq!(injected, "# -*- coding: utf-8 -*-\n# /// script\n# ///\n\n");
    }

    #[test]
    fn test_shebang_and_encoding_without_final_newline() {
        let injected = inject_metadata("#!/usr/bin/env python3\n# coding=latin-1", &minimal());
        assert_eq!(
            injected,
            "#!/usr/bin/env python3\n# coding=latin-1\n# /// script\n# ///\n\n"
        );
    }

    #[test]
    fn test_encoding_only_recognized_in_leading_lines() {
        let code = "import os\n# -*- coding: utf-8 -*-\n";
        let injected = inject_metadata(code, &minimal());
        assert!(injected.starts_with("# /// script\n"));
    }

    #[test]
    fn test_is_encoding_declaration() {
        assert!(is_encoding_declaration("# -*- coding: utf-8 -*-"));
        assert!(is_encoding_declaration("  # coding=latin-1"));
        assert!(is_encoding_declaration("#coding:ascii\n"));
        assert!(!is_encoding_declaration("coding: utf-8"));
        assert!(!is_encoding_declaration("# coding is fun"));
    }

    #[test]
    fn test_injection_is_idempotent() {
        let block = MetadataBlock::parse(NEW);
        let code =
            "#!/usr/bin/env python3\n# -*- coding: utf-8 -*-\n\"\"\"Doc.\"\"\"\nimport requests\n";

        let once = inject_metadata(code, &block);
        let twice = inject_metadata(&once, &block);

        assert_eq!(once, twice);
        assert_eq!(twice.matches("# /// script").count(), 1);
    }

    #[test]
    fn test_unterminated_block_inserts_new_one() {
        let code = "# /// script\nimport os\n";
        let injected = inject_metadata(code, &minimal());
        assert_eq!(injected, "# /// script\n# ///\n\n# /// script\nimport os\n");
    }

    #[test]
    fn test_only_first_block_is_replaced() {
        let code = format!("{}\nx = 1\n{}\n", OLD, OLD);
        let result = inject_metadata(&code, &MetadataBlock::parse(NEW));
        assert!(result.starts_with(NEW));
        assert!(result.ends_with(&format!("{}\n", OLD)));
    }

    #[test]
    fn test_crlf_sentinels_are_matched() {
        let code = "# /// script\r\n# ///\r\nimport os\r\n";
        let result = inject_metadata(code, &minimal());
        assert_eq!(result, "# /// script\n# ///\nimport os\r\n");
    }
}
