//! End-to-end behaviour of the exact model on small, hand-checkable sites.

mod common;

use common::{favouring, flat_priors, init_tracing, keep_all_samples, site};
use exact_af::priors::{AfPriorProvider, FlatPriors, HeterozygosityPriors};
use exact_af::{
    pl_index, AfCalcError, AfCalculator, AfPriors, CalculatorRegistry, ExactModelConfig,
    GenotypeLikelihoodMatrix, ReferenceDiploidExact, StateTracker,
};
use test_case::test_case;

fn exact() -> ReferenceDiploidExact {
    ReferenceDiploidExact::new(ExactModelConfig::default())
}

#[test]
fn confident_hom_alt_samples_call_full_count() {
    init_tracing();
    let gls = site(1, vec![vec![-100.0, -50.0, 0.0]; 2]);
    let result = exact().calculate(&gls, &flat_priors(2)).unwrap();

    assert_eq!(result.mle_counts(), &[4]);
    assert_eq!(result.map_counts(), &[4]);
    assert!((result.log_likelihood_of_af_zero() - (-200.0)).abs() < 1e-9);
    assert!(result.log_mle().abs() < 1e-6);
    assert!(result.log_likelihood_of_af_zero() < result.log_mle());
    assert!(result.log_posterior_of_af_gt_zero() > -1e-6);
    assert!(result.is_polymorphic(1, -1.0));
}

#[test]
fn single_sample_het_between_two_alternates() {
    init_tracing();
    let gls = site(2, vec![favouring(2, pl_index(1, 2), 30.0)]);
    let result = exact().calculate(&gls, &flat_priors(1)).unwrap();

    assert_eq!(result.alleles_used(), &[1, 2]);
    assert_eq!(result.mle_counts(), &[1, 1]);
    assert_eq!(result.map_counts(), &[1, 1]);
    assert_eq!(result.allele_count_at_mle(2), Some(1));
    assert!(result.passes_threshold(30.0).unwrap());
}

#[test_case(&[0, 0, 0], 1 ; "all hom ref still reports best non-zero count")]
#[test_case(&[1, 0, 0], 1 ; "one het")]
#[test_case(&[2, 1, 0], 3 ; "hom alt plus het")]
#[test_case(&[1, 1, 2], 4 ; "two hets plus hom alt")]
#[test_case(&[2, 2, 2], 6 ; "all hom alt")]
fn biallelic_mle_tracks_favoured_genotypes(genotypes: &[usize], expected: usize) {
    let rows = genotypes.iter().map(|&g| favouring(1, g, 50.0)).collect();
    let result = exact().calculate(&site(1, rows), &flat_priors(3)).unwrap();
    assert_eq!(result.mle_counts(), &[expected]);
}

#[test]
fn priors_move_map_away_from_mle() {
    let gls = site(1, vec![vec![-5.0, -1.0, 0.0]]);
    let priors = AfPriors::new(vec![0.0, 0.0, -10.0]).unwrap();
    let result = exact().calculate(&gls, &priors).unwrap();

    assert_eq!(result.mle_counts(), &[2]);
    assert_eq!(result.map_counts(), &[1]);
    assert!((result.log_map() - (-1.0)).abs() < 1e-6);
}

#[test]
fn heterozygosity_prior_favours_the_reference() {
    let gls = site(1, vec![vec![-2.0, 0.0, -4.0]; 2]);
    let neutral = HeterozygosityPriors::new(1e-3).unwrap().priors(4).unwrap();
    let flat = FlatPriors.priors(4).unwrap();

    let with_neutral = exact().calculate(&gls, &neutral).unwrap();
    let with_flat = exact().calculate(&gls, &flat).unwrap();

    assert_eq!(with_neutral.mle_counts(), with_flat.mle_counts());
    assert_eq!(with_neutral.log_likelihoods(), with_flat.log_likelihoods());
    assert!(with_neutral.log_posterior_of_af_eq_zero() > with_flat.log_posterior_of_af_eq_zero());
}

#[test]
fn zero_alternate_alleles_leave_vectors_empty() {
    let gls = site(0, vec![vec![-0.5], vec![-1.5]]);
    let result = exact().calculate(&gls, &flat_priors(2)).unwrap();

    assert!(result.mle_counts().is_empty());
    assert!(result.map_counts().is_empty());
    assert_eq!(result.log_mle(), f64::NEG_INFINITY);
    assert_eq!(result.log_likelihoods()[0], 0.0);
    assert_eq!(result.log_likelihoods()[1], f64::NEG_INFINITY);
    assert!(!result.passes_threshold(10.0).unwrap());
}

#[test]
fn no_samples_posterior_is_the_prior() {
    let gls = GenotypeLikelihoodMatrix::new(1, Vec::new()).unwrap();
    let priors = AfPriors::new(vec![-0.7]).unwrap();
    let result = exact().calculate(&gls, &priors).unwrap();

    assert_eq!(result.log_likelihood_of_af_zero(), 0.0);
    assert_eq!(result.log_posterior_of_af_zero(), -0.7);
    assert_eq!(result.mle_counts(), &[0]);
}

#[test]
fn uninformative_samples_are_dropped_before_the_model() {
    // Second sample carries no evidence and would otherwise need priors
    // covering four chromosomes.
    let gls = site(1, vec![vec![-20.0, -10.0, 0.0], vec![0.0, 0.0, 0.0]]);
    let result = exact().calculate(&gls, &flat_priors(1)).unwrap();
    assert_eq!(result.mle_counts(), &[2]);

    let strict = ReferenceDiploidExact::new(keep_all_samples());
    assert_eq!(
        strict.calculate(&gls, &flat_priors(1)).unwrap_err(),
        AfCalcError::PriorsTooShort {
            required: 5,
            actual: 3
        }
    );
}

#[test]
fn excess_alternates_are_reduced_to_the_best_supported() {
    // ref, A, B, C: one sample ref/B, one C/C, one hom-ref.
    let gls = site(
        3,
        vec![
            favouring(3, pl_index(0, 2), 20.0),
            favouring(3, pl_index(3, 3), 50.0),
            favouring(3, pl_index(0, 0), 10.0),
        ],
    );
    let config = ExactModelConfig::new(2, ExactModelConfig::default().abort_log_margin).unwrap();
    let result = ReferenceDiploidExact::new(config)
        .calculate(&gls, &flat_priors(3))
        .unwrap();

    assert_eq!(result.alleles_used(), &[2, 3]);
    assert_eq!(result.mle_counts(), &[1, 2]);
    assert_eq!(result.allele_count_at_mle(1), None);
    assert!(!result.is_polymorphic(1, -1.0));
}

#[test]
fn caller_owned_tracker_is_reused_across_sites() {
    let calculator = exact();
    let mut tracker = StateTracker::new(2, ExactModelConfig::default().abort_log_margin);

    let first = site(2, vec![favouring(2, pl_index(2, 2), 30.0)]);
    let second = site(1, vec![favouring(1, pl_index(0, 1), 30.0)]);
    let a = calculator
        .calculate_with_tracker(&first, &flat_priors(1), &mut tracker)
        .unwrap();
    let b = calculator
        .calculate_with_tracker(&second, &flat_priors(1), &mut tracker)
        .unwrap();

    assert_eq!(a.mle_counts(), &[0, 2]);
    assert_eq!(b.mle_counts(), &[1]);
    assert_eq!(tracker.num_alt_alleles(), 1);
}

#[test]
fn undersized_tracker_is_rejected() {
    let gls = site(2, vec![favouring(2, pl_index(1, 2), 30.0)]);
    let mut tracker = StateTracker::new(1, 10.0);
    assert_eq!(
        exact()
            .calculate_with_tracker(&gls, &flat_priors(1), &mut tracker)
            .unwrap_err(),
        AfCalcError::TrackerCapacity {
            requested: 2,
            capacity: 1
        }
    );
}

#[test]
fn malformed_input_is_rejected() {
    assert_eq!(
        GenotypeLikelihoodMatrix::new(1, vec![vec![0.0, -1.0]]).unwrap_err(),
        AfCalcError::LikelihoodLength {
            sample: 0,
            expected: 3,
            actual: 2
        }
    );
    assert!(matches!(
        GenotypeLikelihoodMatrix::new(1, vec![vec![0.0, f64::NAN, -1.0]]),
        Err(AfCalcError::NonFiniteLikelihood { sample: 0, index: 1 })
    ));
    assert!(matches!(
        ExactModelConfig::new(2, -1.0),
        Err(AfCalcError::InvalidConfiguration(_))
    ));
}

#[test]
fn registry_dispatches_by_name() {
    let registry = CalculatorRegistry::with_defaults(keep_all_samples());
    let gls = site(1, vec![vec![-30.0, 0.0, -30.0], vec![-30.0, -30.0, 0.0]]);

    let exact = registry.get("exact_reference").unwrap();
    let brute = registry.get("brute_force").unwrap();
    let from_exact = exact.calculate(&gls, &flat_priors(2)).unwrap();
    let from_brute = brute.calculate(&gls, &flat_priors(2)).unwrap();

    assert_eq!(from_exact.mle_counts(), &[3]);
    assert_eq!(from_exact.mle_counts(), from_brute.mle_counts());
    assert!((from_exact.log_mle() - from_brute.log_mle()).abs() < 1e-5);
    assert!(matches!(
        registry.get("exact_independent"),
        Err(AfCalcError::UnknownCalculator(_))
    ));
}
