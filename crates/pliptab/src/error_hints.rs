use anyhow::Error;

pub(crate) fn format(err: &Error) -> String {
    let mut out = format!("Error: {err:#}");
    let hints = suggestions(err);
    if !hints.is_empty() {
        out.push_str("\n\nHints:\n");
        for hint in hints {
            out.push_str("- ");
            out.push_str(&hint);
            out.push('\n');
        }
    }
    out
}

fn suggestions(err: &Error) -> Vec<String> {
    let chain: Vec<String> = err.chain().map(|e| e.to_string()).collect();
    let haystack = chain.join(" | ").to_ascii_lowercase();
    let mut out: Vec<String> = Vec::new();

    if haystack.contains("input path does not exist") {
        push_hint(&mut out, "Verify the folder exists and is readable.");
        push_hint(
            &mut out,
            "Use an absolute path to avoid working-directory confusion.",
        );
    }

    if haystack.contains("no structure files") {
        push_hint(
            &mut out,
            "Only files directly inside the folder are considered; subfolders are not searched.",
        );
    }

    if haystack.contains("no valid plip output") {
        if haystack.contains("child-process failure") {
            push_hint(
                &mut out,
                "Check that PLIP is installed and runs, or point at it with `--tool <PROGRAM>`.",
            );
        }
        if haystack.contains("no report in output") {
            push_hint(
                &mut out,
                "Let pliptab rerun the tool with more output: `--attempts quiet,verbose`.",
            );
        }
        push_hint(&mut out, "Rerun with `-v` to see each file's failure.");
    }

    if haystack.contains("timed out") {
        push_hint(&mut out, "Raise the limit with `--timeout <SECONDS>`.");
    }

    if haystack.contains("greater than zero seconds") {
        push_hint(&mut out, "Omit `--timeout` to wait without a limit.");
    }

    if haystack.contains("failed to create output file") {
        push_hint(
            &mut out,
            "Check that the output directory exists and is writable, or pass `-o <PATH>`.",
        );
    }

    out
}

fn push_hint(out: &mut Vec<String>, hint: &str) {
    if !out.iter().any(|h| h == hint) {
        out.push(hint.to_string());
    }
}
