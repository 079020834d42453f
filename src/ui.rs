use anyhow::Result;
use console::{Style, Term};
use ravenfoot::{EntropyBreakdown, GenerationRequest, LoadWarning, Strength, VocabularyCollection};
use zeroize::Zeroizing;

pub const MIN_SAFE_WORD_COUNT: usize = 4;

pub struct DisplayOptions {
    pub unicode_support: bool,
    pub color_support: bool,
    pub quiet: bool,
}

pub fn detect_unicode_support() -> bool {
    supports_unicode::on(supports_unicode::Stream::Stdout)
}

pub fn detect_color_support() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

pub fn get_status_symbols(unicode_support: bool) -> (&'static str, &'static str) {
    if unicode_support {
        ("✓", "!")
    } else {
        ("+", "!")
    }
}

/// Branch and last-branch glyphs for the stats tree.
pub fn get_tree_glyphs(unicode_support: bool) -> (&'static str, &'static str) {
    if unicode_support {
        ("├─", "└─")
    } else {
        ("|-", "`-")
    }
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 { one } else { many }
}

fn style_for(ok: bool, options: &DisplayOptions) -> Style {
    if !options.color_support {
        Style::new()
    } else if ok {
        Style::new().green()
    } else {
        Style::new().yellow()
    }
}

pub fn print_warnings(warnings: &[LoadWarning], options: &DisplayOptions) -> Result<()> {
    if warnings.is_empty() {
        return Ok(());
    }

    let term = Term::stderr();
    let (_, check_warn) = get_status_symbols(options.unicode_support);
    let style = style_for(false, options);

    for warning in warnings {
        term.write_line(&format!(
            "{} {}",
            style.apply_to(format!("[{}]", check_warn)),
            warning
        ))?;
    }
    Ok(())
}

pub fn batch_lines(passwords: &[Zeroizing<String>], quiet: bool) -> Vec<String> {
    passwords
        .iter()
        .enumerate()
        .map(|(i, p)| {
            if quiet {
                p.as_str().to_string()
            } else {
                format!("{:02} {}", i + 1, p.as_str())
            }
        })
        .collect()
}

pub fn stats_lines(
    request: &GenerationRequest,
    vocab: &VocabularyCollection,
    breakdown: &EntropyBreakdown,
    options: &DisplayOptions,
) -> Vec<String> {
    let (check_ok, check_warn) = get_status_symbols(options.unicode_support);
    let (branch, last) = get_tree_glyphs(options.unicode_support);

    let entropy = breakdown.total();
    let strength = Strength::of(entropy);
    let entropy_style = style_for(strength.is_safe(), options);
    let entropy_status = if strength.is_safe() { check_ok } else { check_warn };

    let words_secure = request.word_count >= MIN_SAFE_WORD_COUNT;
    let words_style = style_for(words_secure, options);
    let words_status = if words_secure { check_ok } else { check_warn };

    let lists = vocab.word_lists().len();
    let slots = request.word_count.max(1).saturating_mul(2);

    let mut lines = vec!["Stats:".to_string()];

    lines.push(format!(
        "  {} Words      {} {} {} from {} {} (avg {:.0}), {:.1} bits",
        branch,
        words_style.apply_to(format!("[{}]", words_status)),
        words_style.apply_to(request.word_count),
        plural(request.word_count, "word", "words"),
        lists,
        plural(lists, "list", "lists"),
        vocab.average_word_list_len(),
        breakdown.words
    ));

    lines.push(format!(
        "  {} Specials   {} of {}, {:.1} bits",
        branch,
        request.special_count,
        vocab.specials().len(),
        breakdown.specials
    ));

    lines.push(format!(
        "  {} Numbers    {} of {}, {:.1} bits",
        branch,
        request.number_count,
        vocab.numbers().len(),
        breakdown.numbers
    ));

    lines.push(format!(
        "  {} Placement  {} {} over {} {}, {:.1} bits",
        branch,
        request.token_count(),
        plural(request.token_count(), "token", "tokens"),
        slots,
        plural(slots, "slot", "slots"),
        breakdown.placement
    ));

    lines.push(format!(
        "  {} Entropy    {} {} bits ({})",
        last,
        entropy_style.apply_to(format!("[{}]", entropy_status)),
        entropy_style.apply_to(format!("{:.1}", entropy)),
        entropy_style.apply_to(strength.label())
    ));

    lines.push(String::new());
    lines.push(format!(
        "{} Security: {}",
        entropy_style.apply_to(format!("[{}]", entropy_status)),
        entropy_style.apply_to(strength.label())
    ));

    lines
}

pub fn display_output(
    passwords: &[Zeroizing<String>],
    request: &GenerationRequest,
    vocab: &VocabularyCollection,
    breakdown: &EntropyBreakdown,
    options: &DisplayOptions,
) {
    for line in batch_lines(passwords, options.quiet) {
        println!("{}", line);
    }

    if !options.quiet {
        display_stats(request, vocab, breakdown, options);
    }
}

pub fn display_stats(
    request: &GenerationRequest,
    vocab: &VocabularyCollection,
    breakdown: &EntropyBreakdown,
    options: &DisplayOptions,
) {
    if options.quiet {
        println!("{:.1}", breakdown.total());
        return;
    }

    println!();
    for line in stats_lines(request, vocab, breakdown, options) {
        println!("{}", line);
    }
}
