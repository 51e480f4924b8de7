//! crates/sd_pipeline/src/validate.rs
//! Structural & semantic validation before any computation.
//! Deterministic output: issues are sorted by (code, where, message).
//!
//! Errors block the run; warnings are reported and logged only.

use std::collections::BTreeSet;
use std::fmt;

use sd_core::rounding::{checked_sum, is_negative};
use sd_core::variables;
use sd_core::{Decimal, Params, ProposalId, Stake};
use sd_io::loader::StakeFile;

/// Issue severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

/// Where the issue occurred.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntityRef {
    Root,
    Stake(usize, ProposalId),
    Param(&'static str),
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::Root => f.write_str("/"),
            EntityRef::Stake(i, id) => write!(f, "/stakes/{i} ({id})"),
            EntityRef::Param(name) => write!(f, "params.{name}"),
        }
    }
}

/// One validation finding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
    pub where_: EntityRef,
}

/// pass = no Error-severity issue.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub pass: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.errors().count();
        write!(f, "{n} error(s)")?;
        for i in self.errors() {
            write!(f, "; {} at {}: {}", i.code, i.where_, i.message)?;
        }
        Ok(())
    }
}

/// Validate the loaded stake file against the final (layered) params.
pub fn validate(stakes: &StakeFile, params: &Params) -> ValidationReport {
    let mut issues = Vec::new();

    issues.extend(check_params(params));
    issues.extend(check_stakes(&stakes.stakes));
    issues.extend(check_total(&stakes.stakes, stakes.total));
    issues.extend(check_balance(&stakes.stakes, stakes.account_balance));

    sort_issues_stably(&mut issues);
    ValidationReport {
        pass: !issues.iter().any(|i| i.severity == Severity::Error),
        issues,
    }
}

fn check_params(p: &Params) -> Vec<ValidationIssue> {
    match variables::validate_domains(p) {
        Ok(()) => Vec::new(),
        Err(sd_core::CoreError::DomainOutOfRange(name)) => vec![ValidationIssue {
            severity: Severity::Error,
            code: "Params.OutOfRange",
            message: format!("parameter {name} is outside its domain"),
            where_: EntityRef::Param(name),
        }],
        Err(e) => vec![ValidationIssue {
            severity: Severity::Error,
            code: "Params.Invalid",
            message: e.to_string(),
            where_: EntityRef::Root,
        }],
    }
}

/// Errors:
/// - "Stake.NegativeAmount"
/// - "Stake.DuplicateId" (the chart links rows by proposal id)
/// Warnings:
/// - "Stake.EmptyName"
fn check_stakes(stakes: &[Stake]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut seen = BTreeSet::<&ProposalId>::new();

    for (i, s) in stakes.iter().enumerate() {
        let at = EntityRef::Stake(i, s.proposal_id.clone());
        if is_negative(s.amount) {
            issues.push(ValidationIssue {
                severity: Severity::Error,
                code: "Stake.NegativeAmount",
                message: format!("amount {} is negative", s.amount),
                where_: at.clone(),
            });
        }
        if !seen.insert(&s.proposal_id) {
            issues.push(ValidationIssue {
                severity: Severity::Error,
                code: "Stake.DuplicateId",
                message: format!("proposal {} staked more than once", s.proposal_id),
                where_: at.clone(),
            });
        }
        if s.proposal_name.trim().is_empty() {
            issues.push(ValidationIssue {
                severity: Severity::Warning,
                code: "Stake.EmptyName",
                message: "proposal name is empty".to_string(),
                where_: at,
            });
        }
    }
    issues
}

fn check_total(stakes: &[Stake], total: Option<Decimal>) -> Vec<ValidationIssue> {
    let Some(total) = total else { return Vec::new() };
    if is_negative(total) {
        return vec![ValidationIssue {
            severity: Severity::Error,
            code: "Total.Negative",
            message: format!("total {total} is negative"),
            where_: EntityRef::Root,
        }];
    }
    // Negative amounts are already reported; only compare a meaningful sum.
    if stakes.iter().any(|s| is_negative(s.amount)) {
        return Vec::new();
    }
    match checked_sum(stakes.iter().map(|s| s.amount)) {
        Ok(sum) if sum > total => vec![ValidationIssue {
            severity: Severity::Error,
            code: "Total.BelowSum",
            message: format!("total {total} is below the staked sum {sum}"),
            where_: EntityRef::Root,
        }],
        Ok(_) => Vec::new(),
        Err(e) => vec![ValidationIssue {
            severity: Severity::Error,
            code: "Stake.Overflow",
            message: e.to_string(),
            where_: EntityRef::Root,
        }],
    }
}

/// Warnings only: the influence panel degrades to zero inactive weight.
fn check_balance(stakes: &[Stake], balance: Option<Decimal>) -> Vec<ValidationIssue> {
    let Some(balance) = balance else { return Vec::new() };
    if is_negative(balance) {
        return vec![ValidationIssue {
            severity: Severity::Warning,
            code: "Account.NegativeBalance",
            message: format!("account balance {balance} is negative"),
            where_: EntityRef::Root,
        }];
    }
    match checked_sum(stakes.iter().map(|s| s.amount)) {
        Ok(staked) if staked > balance => vec![ValidationIssue {
            severity: Severity::Warning,
            code: "Account.StakedAboveBalance",
            message: format!("staked {staked} exceeds balance {balance}"),
            where_: EntityRef::Root,
        }],
        _ => Vec::new(),
    }
}

fn sort_issues_stably(issues: &mut [ValidationIssue]) {
    issues.sort_by(|a, b| {
        a.code
            .cmp(b.code)
            .then_with(|| a.where_.cmp(&b.where_))
            .then_with(|| a.message.cmp(&b.message))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn stake(id: &str, amount: Decimal) -> Stake {
        Stake::new(id.parse().unwrap(), format!("P{id}"), amount)
    }

    fn file(stakes: Vec<Stake>) -> StakeFile {
        StakeFile { stakes, ..StakeFile::default() }
    }

    #[test]
    fn clean_input_passes() {
        let r = validate(&file(vec![stake("1", dec!(5)), stake("2", dec!(0))]), &Params::default());
        assert!(r.pass);
        assert!(r.issues.is_empty());
    }

    #[test]
    fn duplicate_and_negative_are_errors_in_stable_order() {
        let r = validate(
            &file(vec![stake("1", dec!(5)), stake("2", dec!(-1)), stake("1", dec!(2))]),
            &Params::default(),
        );
        assert!(!r.pass);
        let codes: Vec<_> = r.issues.iter().map(|i| i.code).collect();
        assert_eq!(codes, vec!["Stake.DuplicateId", "Stake.NegativeAmount"]);
        assert_eq!(r.issues[0].where_, EntityRef::Stake(2, "1".parse().unwrap()));
    }

    #[test]
    fn params_domain_is_checked() {
        let p = Params { max_included: 0, ..Params::default() };
        let r = validate(&file(vec![]), &p);
        assert!(!r.pass);
        assert_eq!(r.issues[0].where_, EntityRef::Param("max_included"));
    }

    #[test]
    fn explicit_total_below_sum_is_an_error() {
        let mut f = file(vec![stake("1", dec!(5)), stake("2", dec!(6))]);
        f.total = Some(dec!(10));
        let r = validate(&f, &Params::default());
        assert_eq!(r.errors().map(|i| i.code).collect::<Vec<_>>(), vec!["Total.BelowSum"]);

        f.total = Some(dec!(11));
        assert!(validate(&f, &Params::default()).pass);
    }

    #[test]
    fn balance_oddities_are_warnings() {
        let mut f = file(vec![stake("1", dec!(5))]);
        f.account_balance = Some(dec!(3));
        let r = validate(&f, &Params::default());
        assert!(r.pass);
        assert_eq!(r.warnings().map(|i| i.code).collect::<Vec<_>>(), vec!["Account.StakedAboveBalance"]);
    }

    #[test]
    fn display_lists_errors() {
        let r = validate(&file(vec![stake("9", dec!(-2))]), &Params::default());
        assert_eq!(
            r.to_string(),
            "1 error(s); Stake.NegativeAmount at /stakes/0 (9): amount -2 is negative"
        );
    }
}
