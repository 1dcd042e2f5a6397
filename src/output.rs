//! Reads the product off a halted multiplication tape.

use crate::types::BLANK;

/// Computes the result encoded on `tape`.
///
/// The tape is split into blocks separated by single blanks; blanks at the right end do not
/// produce blocks. The result is the length of the rightmost block. A tape containing two
/// adjacent blanks has collapsed and yields `0`, as does a tape with no block at all.
///
/// The double blank rule follows the tape discipline of the multiplication program and is not
/// a general validity check for arbitrary machines.
pub fn extract_result(tape: &str) -> usize {
    let double_blank: String = [BLANK, BLANK].iter().collect();
    if tape.contains(&double_blank) {
        return 0;
    }

    tape.trim_end_matches(BLANK)
        .rsplit(BLANK)
        .next()
        .map_or(0, |block| block.chars().count())
}
