use spdx::Expression;

/// Whether a raw string parses as an SPDX license expression.
pub fn is_valid_expression(raw: &str) -> bool {
    Expression::parse(raw).is_ok()
}

/// Whether `candidate` is satisfied by the `permitted` expression.
///
/// A candidate holds when some disjunctive choice of its terms is entirely
/// acceptable, and a single term is acceptable when assigning exactly that
/// term true satisfies the permitted expression. So `MIT` satisfies
/// `MIT OR Apache-2.0`, `MIT OR GPL-3.0-only` satisfies `MIT`, and
/// `MIT AND GPL-3.0-only` does not satisfy `MIT OR Apache-2.0`.
///
/// Either side failing to parse yields false, never an error.
pub fn satisfies(candidate: &str, permitted: &str) -> bool {
    let candidate = match Expression::parse(candidate) {
        Ok(expr) => expr,
        Err(_) => return false,
    };
    let permitted = match Expression::parse(permitted) {
        Ok(expr) => expr,
        Err(_) => return false,
    };

    candidate.evaluate(|req| permitted.evaluate(|allowed| allowed == req))
}
