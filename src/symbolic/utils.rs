// the collection of utility functions mainly for bracket parsing and proceeding

/// true if every '(' has a matching ')' and no ')' closes an unopened bracket
pub fn brackets_are_balanced(s: &str) -> bool {
    let mut depth: i64 = 0;
    for c in s.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

/// byte position of the bracket closing the one opened at `bracket_start`
pub fn find_pair_to_this_bracket(input: &str, bracket_start: usize) -> Option<usize> {
    let mut depth = 0;
    for (i, c) in input.char_indices().skip_while(|(i, _)| *i < bracket_start) {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// A '+' or '-' is a sign (not a binary operator) when nothing but an operator or an opening
/// bracket stands before it, or when it belongs to the exponent of a literal like `1e-5`.
fn is_sign(chars: &[(usize, char)], idx: usize) -> bool {
    let mut j = idx;
    while j > 0 {
        j -= 1;
        let c = chars[j].1;
        if c.is_whitespace() {
            continue;
        }
        if matches!(c, '+' | '-' | '*' | '/' | '^' | '(') {
            return true;
        }
        if (c == 'e' || c == 'E') && j == idx - 1 {
            return is_exponent_marker(chars, j);
        }
        return false;
    }
    true
}

/// true if the 'e' at `e_idx` is the exponent marker of a number literal
fn is_exponent_marker(chars: &[(usize, char)], e_idx: usize) -> bool {
    let mut j = e_idx;
    let mut saw_digit = false;
    while j > 0 {
        let c = chars[j - 1].1;
        if c.is_ascii_digit() {
            saw_digit = true;
        } else if c != '.' {
            return saw_digit && !(c.is_alphanumeric() || c == '_');
        }
        j -= 1;
    }
    saw_digit
}

/// function to find the rightmost occurrence of binary operators at the same precedence level
/// outside brackets; rightmost split gives left associativity
pub fn find_rightmost_operator_outside_brackets(
    input: &str,
    operators: &[char],
) -> Option<(usize, char)> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let mut depth = 0;
    let mut found = None;
    for (idx, &(pos, c)) in chars.iter().enumerate() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ if depth == 0 && operators.contains(&c) => {
                let signed = (c == '+' || c == '-') && is_sign(&chars, idx);
                if !signed {
                    found = Some((pos, c));
                }
            }
            _ => {}
        }
    }
    found
}

/// find position of the first occurrence of a char outside brackets
pub fn find_char_position_outside_brackets(s: &str, target: char) -> Option<usize> {
    let mut depth = 0;
    for (i, ch) in s.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ if ch == target && depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// true for names like `x`, `x_1`, `velocity`
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
