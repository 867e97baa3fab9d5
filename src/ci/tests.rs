//! Tests for the CI environment adapters.

use rstest::rstest;

use super::{
    CiEnvironment, CiProvider, CiState, CircleCiEnvironment, EnvSnapshot, ProcessEnv,
    ProviderEnvironment, TravisEnvironment,
};
use crate::error::BotError;
use crate::github::RepoDetails;

fn circleci(pairs: &[(&str, &str)]) -> CircleCiEnvironment<EnvSnapshot> {
    CircleCiEnvironment::new(EnvSnapshot::from_pairs(pairs.iter().copied()))
}

fn travis(pairs: &[(&str, &str)]) -> TravisEnvironment<EnvSnapshot> {
    TravisEnvironment::new(EnvSnapshot::from_pairs(pairs.iter().copied()))
}

#[rstest]
#[case::unset(&[], false)]
#[case::other_value(&[("CIRCLECI", "1")], false)]
#[case::enabled(&[("CIRCLECI", "true")], true)]
fn circleci_detects_ci(#[case] pairs: &[(&str, &str)], #[case] expected: bool) {
    assert_eq!(circleci(pairs).is_ci(), expected, "is_ci for {pairs:?}");
}

#[rstest]
#[case::unset(&[], false)]
#[case::empty(&[("CIRCLE_PULL_REQUEST", "")], false)]
#[case::url(&[("CIRCLE_PULL_REQUEST", "https://github.com/owner/repo/pull/249")], true)]
fn circleci_detects_pull_request(#[case] pairs: &[(&str, &str)], #[case] expected: bool) {
    assert_eq!(
        circleci(pairs).is_pull_request(),
        expected,
        "is_pull_request for {pairs:?}"
    );
}

#[rstest]
#[case::no_variables(&[], None)]
#[case::only_repo_name(&[("CIRCLE_PROJECT_REPONAME", "example")], None)]
#[case::only_username(&[("CIRCLE_PROJECT_USERNAME", "example-owner")], None)]
#[case::both(
    &[("CIRCLE_PROJECT_USERNAME", "example-owner"), ("CIRCLE_PROJECT_REPONAME", "example-repo")],
    Some(RepoDetails::new("example-owner", "example-repo"))
)]
fn circleci_repo_details(
    #[case] pairs: &[(&str, &str)],
    #[case] expected: Option<RepoDetails>,
) {
    assert_eq!(circleci(pairs).repo_details(), expected, "repo details for {pairs:?}");
}

#[rstest]
#[case::unset(&[], None)]
#[case::pull_url(&[("CIRCLE_PULL_REQUEST", "https://github.com/owner/repo/pull/123456")], Some("123456"))]
#[case::short_url(&[("CIRCLE_PULL_REQUEST", "https://github.com/owner/repo/123")], Some("123"))]
#[case::trailing_slash(&[("CIRCLE_PULL_REQUEST", "https://github.com/owner/repo/pull/")], None)]
fn circleci_pull_request_number(
    #[case] pairs: &[(&str, &str)],
    #[case] expected: Option<&str>,
) {
    assert_eq!(
        circleci(pairs).pull_request_number().as_deref(),
        expected,
        "number for {pairs:?}"
    );
}

#[rstest]
fn circleci_reads_sha_and_branch() {
    let env = circleci(&[
        ("CIRCLE_SHA1", "123456789abcde"),
        ("CIRCLE_BRANCH", "my-random-branch"),
    ]);

    assert_eq!(env.pull_request_sha().as_deref(), Some("123456789abcde"));
    assert_eq!(env.git_branch().as_deref(), Some("my-random-branch"));
    assert_eq!(circleci(&[]).pull_request_sha(), None, "sha should be absent");
    assert_eq!(circleci(&[]).git_branch(), None, "branch should be absent");
}

#[rstest]
#[case::push_build(&[("TRAVIS", "true"), ("TRAVIS_EVENT_TYPE", "push")], true, false)]
#[case::pull_request(&[("TRAVIS", "true"), ("TRAVIS_EVENT_TYPE", "pull_request")], true, true)]
#[case::local(&[], false, false)]
fn travis_detects_ci_and_pull_request(
    #[case] pairs: &[(&str, &str)],
    #[case] is_ci: bool,
    #[case] is_pull_request: bool,
) {
    let env = travis(pairs);
    assert_eq!(env.is_ci(), is_ci, "is_ci for {pairs:?}");
    assert_eq!(env.is_pull_request(), is_pull_request, "is_pull_request for {pairs:?}");
}

#[rstest]
#[case::slug("gauntface/example-repo", Some(RepoDetails::new("gauntface", "example-repo")))]
#[case::no_separator("example", None)]
#[case::nested("example/example-two/nope", None)]
fn travis_repo_details_from_slug(#[case] slug: &str, #[case] expected: Option<RepoDetails>) {
    assert_eq!(
        travis(&[("TRAVIS_REPO_SLUG", slug)]).repo_details(),
        expected,
        "repo details for {slug:?}"
    );
}

#[rstest]
#[case::number("123", Some("123"))]
#[case::push_build("false", None)]
#[case::empty("", None)]
fn travis_pull_request_number(#[case] raw: &str, #[case] expected: Option<&str>) {
    assert_eq!(
        travis(&[("TRAVIS_PULL_REQUEST", raw)])
            .pull_request_number()
            .as_deref(),
        expected,
        "number for {raw:?}"
    );
}

#[rstest]
#[case::travis("travis", Ok(CiProvider::Travis))]
#[case::circleci("circleci", Ok(CiProvider::CircleCi))]
#[case::mixed_case("CircleCI", Ok(CiProvider::CircleCi))]
#[case::unknown("jenkins", Err(BotError::UnknownCiProvider { name: "jenkins".to_owned() }))]
fn parses_provider_names(#[case] raw: &str, #[case] expected: Result<CiProvider, BotError>) {
    assert_eq!(raw.parse::<CiProvider>(), expected, "provider for {raw:?}");
}

#[rstest]
fn provider_environment_dispatches_to_selected_adapter() {
    let env = EnvSnapshot::from_pairs([
        ("TRAVIS", "true"),
        ("TRAVIS_EVENT_TYPE", "pull_request"),
        ("TRAVIS_PULL_REQUEST", "123"),
        ("TRAVIS_PULL_REQUEST_SHA", "ABCSHA"),
        ("TRAVIS_REPO_SLUG", "octo/widgets"),
        ("TRAVIS_BRANCH", "main"),
    ]);

    let travis_state = CiState::capture(&ProviderEnvironment::new(CiProvider::Travis, env.clone()));
    let circle_state = CiState::capture(&ProviderEnvironment::new(CiProvider::CircleCi, env));

    assert_eq!(
        travis_state,
        CiState {
            is_ci: true,
            is_pull_request: true,
            pull_request_sha: Some("ABCSHA".to_owned()),
            pull_request_number: Some("123".to_owned()),
            git_branch: Some("main".to_owned()),
            repo_details: Some(RepoDetails::new("octo", "widgets")),
        },
        "travis state mismatch"
    );
    assert_eq!(circle_state, CiState::default(), "circleci should see nothing");
}

#[rstest]
fn process_env_reflects_runtime_changes() {
    let env = CircleCiEnvironment::new(ProcessEnv);

    {
        let _guard = env_lock::lock_env([("CIRCLECI", Some("true"))]);
        assert!(env.is_ci(), "should read CIRCLECI=true");
    }
    {
        let _guard = env_lock::lock_env([("CIRCLECI", None::<&str>)]);
        assert!(!env.is_ci(), "should observe CIRCLECI being removed");
    }
}

#[rstest]
fn captured_snapshot_ignores_later_changes() {
    let snapshot = {
        let _guard = env_lock::lock_env([
            ("TRAVIS", Some("true")),
            ("TRAVIS_REPO_SLUG", Some("octo/widgets")),
        ]);
        EnvSnapshot::capture()
    };
    let env = TravisEnvironment::new(snapshot);

    let _guard = env_lock::lock_env([("TRAVIS", None::<&str>), ("TRAVIS_REPO_SLUG", None)]);
    assert!(env.is_ci(), "snapshot should keep TRAVIS=true");
    assert_eq!(
        env.repo_details(),
        Some(RepoDetails::new("octo", "widgets")),
        "snapshot should keep the slug"
    );
}
