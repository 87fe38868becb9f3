//! Validates a table of YAML config fixtures and checks that every expected
//! violation is reported at the expected path, and nothing else.

use chugsplash_schema::{validate_document, DocumentFormat, Validator, ViolationReason};

struct Fixture {
    name: &'static str,
    yaml: &'static str,
    expected: &'static [(&'static str, ViolationReason)],
}

const FIXTURES: &[Fixture] = &[
    Fixture {
        name: "minimal",
        yaml: "options: {name: A, owner: '0x1'}\ncontracts: {}\n",
        expected: &[],
    },
    Fixture {
        name: "attach-and-deploy",
        yaml: "\
options: {name: A, owner: '0x1'}
contracts:
  Registry:
    source: Registry.sol
    address: '0xAbCdEf0123456789abcdef0123456789ABCDEF01'
  Token:
    source: Token.sol
    variables:
      supply: '1000000000000000000000000'
      holders: {alice: 1, bob: 2}
",
        expected: &[],
    },
    Fixture {
        name: "null-optional-fields",
        yaml: "\
options: {name: A, owner: '0x1'}
contracts:
  Foo: {source: Foo.sol, address: null, variables: null}
",
        expected: &[],
    },
    Fixture {
        name: "empty-options",
        yaml: "options: {name: '', owner: ''}\ncontracts: {}\n",
        expected: &[
            ("options.name", ViolationReason::EmptyString),
            ("options.owner", ViolationReason::EmptyString),
        ],
    },
    Fixture {
        name: "missing-sections",
        yaml: "name: A\n",
        expected: &[
            ("options", ViolationReason::MissingField),
            ("contracts", ViolationReason::MissingField),
        ],
    },
    Fixture {
        name: "bad-contract-entries",
        yaml: "\
options: {name: A, owner: '0x1'}
contracts:
  Bad: 7
  NoSource: {variables: {}}
  ShortAddr: {source: S.sol, address: '0x12'}
",
        expected: &[
            ("contracts.Bad", ViolationReason::WrongType),
            ("contracts.NoSource.source", ViolationReason::MissingField),
            ("contracts.ShortAddr.address", ViolationReason::InvalidAddress),
        ],
    },
    Fixture {
        name: "bad-variables",
        yaml: "\
options: {name: A, owner: '0x1'}
contracts:
  Foo:
    source: Foo.sol
    variables:
      ratio: 0.5
      list: [1, null]
      nested: {inner: {ok: true, bad: 1.5}}
",
        expected: &[
            ("contracts.Foo.variables.list[1]", ViolationReason::WrongType),
            ("contracts.Foo.variables.nested.inner.bad", ViolationReason::NonIntegerNumber),
            ("contracts.Foo.variables.ratio", ViolationReason::NonIntegerNumber),
        ],
    },
    Fixture {
        name: "duplicate-contract",
        yaml: "\
options: {name: A, owner: '0x1'}
contracts:
  Foo: {source: Foo.sol}
  Foo: {source: Other.sol}
",
        expected: &[("contracts.Foo", ViolationReason::DuplicateKey)],
    },
];

#[test]
fn fixtures_report_exactly_the_expected_violations() {
    let validator = Validator::new();
    for fixture in FIXTURES {
        let result = validate_document(&validator, fixture.yaml, DocumentFormat::Yaml);
        match (result, fixture.expected.is_empty()) {
            (Ok(_), true) => {}
            (Ok(_), false) => panic!("{}: expected violations, got none", fixture.name),
            (Err(e), true) => panic!("{}: unexpected failure: {e}", fixture.name),
            (Err(e), false) => {
                let violations = e
                    .violations()
                    .unwrap_or_else(|| panic!("{}: not a schema failure: {e}", fixture.name));
                for (path, reason) in fixture.expected {
                    assert!(
                        violations.find(path, *reason).is_some(),
                        "{}: missing {reason} at {path}; got:\n{violations}",
                        fixture.name
                    );
                }
                assert_eq!(
                    violations.len(),
                    fixture.expected.len(),
                    "{}: unexpected extra violations:\n{violations}",
                    fixture.name
                );
            }
        }
    }
}

#[test]
fn every_violation_line_names_its_reason() {
    let fixture = &FIXTURES[6];
    let err = validate_document(&Validator::new(), fixture.yaml, DocumentFormat::Yaml).unwrap_err();
    let report = err.to_string();
    assert!(report.starts_with("config validation failed with 3 violation(s):"));
    assert!(report.contains("contracts.Foo.variables.ratio:"));
    assert!(report.contains("[NonIntegerNumber]"));
}
