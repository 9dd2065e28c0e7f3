//! Query-time error model.

use thiserror::Error;

/// Result type used by every lookup and policy query.
pub type CatalogResult<T> = Result<T, CatalogApiError>;

/// Closed set of failure kinds a catalog query can report.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NullProductName,
    NoSuchProduct,
    NoSuchPlan,
    NoSuchPhase,
    BadPhaseName,
    PlanNotFound,
    NoSuchPriceList,
    PriceListNotFound,
    NoPriceForCurrency,
    IllegalChangeRequest,
    NoMatchingRule,
}

impl ErrorCode {
    /// Stable numeric code, suitable for wire formats and logs.
    pub fn code(self) -> u32 {
        match self {
            ErrorCode::NullProductName => 2000,
            ErrorCode::NoSuchProduct => 2010,
            ErrorCode::NoSuchPlan => 2011,
            ErrorCode::NoSuchPhase => 2012,
            ErrorCode::BadPhaseName => 2013,
            ErrorCode::PlanNotFound => 2020,
            ErrorCode::NoSuchPriceList => 2030,
            ErrorCode::PriceListNotFound => 2031,
            ErrorCode::NoPriceForCurrency => 2040,
            ErrorCode::IllegalChangeRequest => 2050,
            ErrorCode::NoMatchingRule => 2060,
        }
    }

    /// Message template; each `{}` is replaced by the next diagnostic argument.
    pub fn template(self) -> &'static str {
        match self {
            ErrorCode::NullProductName => "Null product name",
            ErrorCode::NoSuchProduct => "Could not find a product matching '{}'",
            ErrorCode::NoSuchPlan => "Could not find a plan matching '{}'",
            ErrorCode::NoSuchPhase => "Could not find a phase matching '{}'",
            ErrorCode::BadPhaseName => "Bad phase name '{}'",
            ErrorCode::PlanNotFound => {
                "Could not find a plan matching product '{}', billing period '{}', price list '{}'"
            }
            ErrorCode::NoSuchPriceList => "Could not find a price list named '{}'",
            ErrorCode::PriceListNotFound => {
                "Could not resolve price list '{}': catalog '{}' has no price lists"
            }
            ErrorCode::NoPriceForCurrency => "No price defined for currency '{}'",
            ErrorCode::IllegalChangeRequest => {
                "Changing plan from (product '{}', billing period '{}', price list '{}') to \
                 (product '{}', billing period '{}', price list '{}') is not allowed by catalog rules"
            }
            ErrorCode::NoMatchingRule => "No plan rule matched in category '{}'",
        }
    }
}

/// Query-time failure: an [`ErrorCode`] plus the identifiers that failed to
/// resolve, so callers can render a precise message without re-deriving
/// context.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct CatalogApiError {
    code: ErrorCode,
    args: Vec<Option<String>>,
    message: String,
}

impl CatalogApiError {
    pub fn new(code: ErrorCode, args: Vec<Option<String>>) -> Self {
        let message = render(code.template(), &args);
        Self {
            code,
            args,
            message,
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Diagnostic arguments in template order; `None` stands for a null name.
    pub fn args(&self) -> &[Option<String>] {
        &self.args
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn null_product_name() -> Self {
        Self::new(ErrorCode::NullProductName, Vec::new())
    }

    pub fn no_such_product(name: Option<&str>) -> Self {
        Self::new(ErrorCode::NoSuchProduct, vec![owned(name)])
    }

    pub fn no_such_plan(name: Option<&str>) -> Self {
        Self::new(ErrorCode::NoSuchPlan, vec![owned(name)])
    }

    pub fn no_such_phase(name: Option<&str>) -> Self {
        Self::new(ErrorCode::NoSuchPhase, vec![owned(name)])
    }

    pub fn bad_phase_name(name: &str) -> Self {
        Self::new(ErrorCode::BadPhaseName, vec![Some(name.to_string())])
    }

    pub fn plan_not_found(product: &str, period: &str, price_list: Option<&str>) -> Self {
        Self::new(
            ErrorCode::PlanNotFound,
            vec![Some(product.to_string()), Some(period.to_string()), owned(price_list)],
        )
    }

    pub fn no_such_price_list(name: Option<&str>) -> Self {
        Self::new(ErrorCode::NoSuchPriceList, vec![owned(name)])
    }

    /// The document has no price list set at all.
    pub fn price_list_not_found(name: Option<&str>, catalog_name: &str) -> Self {
        Self::new(
            ErrorCode::PriceListNotFound,
            vec![owned(name), Some(catalog_name.to_string())],
        )
    }

    pub fn no_price_for_currency(currency: &str) -> Self {
        Self::new(ErrorCode::NoPriceForCurrency, vec![Some(currency.to_string())])
    }

    /// `from` and `to` are `(product, billing period, price list)` triples.
    pub fn illegal_change_request(from: [Option<&str>; 3], to: [Option<&str>; 3]) -> Self {
        let args = from.into_iter().chain(to).map(owned).collect();
        Self::new(ErrorCode::IllegalChangeRequest, args)
    }

    pub fn no_matching_rule(category: &str) -> Self {
        Self::new(ErrorCode::NoMatchingRule, vec![Some(category.to_string())])
    }
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

fn render(template: &str, args: &[Option<String>]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut parts = template.split("{}");

    if let Some(head) = parts.next() {
        out.push_str(head);
    }
    for part in parts {
        match args.next() {
            Some(Some(arg)) => out.push_str(arg),
            Some(None) => out.push_str("null"),
            None => out.push('?'),
        }
        out.push_str(part);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_substitutes_arguments_in_order() {
        let err = CatalogApiError::plan_not_found("Basic", "ANNUAL", Some("standard"));
        assert_eq!(err.code(), ErrorCode::PlanNotFound);
        assert_eq!(
            err.to_string(),
            "Could not find a plan matching product 'Basic', billing period 'ANNUAL', price list 'standard'"
        );
    }

    #[test]
    fn null_argument_is_kept_distinct_from_the_string_null() {
        let err = CatalogApiError::no_such_product(None);
        assert_eq!(err.args(), &[None]);
        assert_eq!(err.message(), "Could not find a product matching 'null'");

        let named = CatalogApiError::no_such_product(Some("null"));
        assert_eq!(named.args(), &[Some("null".to_string())]);
        assert_ne!(err, named);
    }

    #[test]
    fn missing_arguments_render_as_placeholder() {
        let err = CatalogApiError::new(ErrorCode::NoSuchPlan, Vec::new());
        assert_eq!(err.message(), "Could not find a plan matching '?'");
    }

    #[test]
    fn illegal_change_request_carries_both_triples() {
        let err = CatalogApiError::illegal_change_request(
            [Some("Basic"), Some("MONTHLY"), Some("standard")],
            [Some("Basic"), Some("MONTHLY"), None],
        );
        assert_eq!(err.args().len(), 6);
        assert!(err.message().contains("price list 'null'"));
    }

    #[test]
    fn codes_are_unique() {
        let all = [
            ErrorCode::NullProductName,
            ErrorCode::NoSuchProduct,
            ErrorCode::NoSuchPlan,
            ErrorCode::NoSuchPhase,
            ErrorCode::BadPhaseName,
            ErrorCode::PlanNotFound,
            ErrorCode::NoSuchPriceList,
            ErrorCode::PriceListNotFound,
            ErrorCode::NoPriceForCurrency,
            ErrorCode::IllegalChangeRequest,
            ErrorCode::NoMatchingRule,
        ];
        let mut codes: Vec<u32> = all.iter().map(|c| c.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }
}
