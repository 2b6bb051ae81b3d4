use criterion::{criterion_group, criterion_main, Criterion};
use merlin::Transcript;
use tessera_algebra::{bls12_381::BLSScalar, prelude::*};
use tessera_plonk::plonk::{
    constraint_system::{SparseCS, Witness},
    indexer::indexer,
    prover::prover,
    verifier::verifier,
};
use tessera_plonk::poly_commit::kzg_poly_com::KZGCommitmentSchemeBLS;

fn bench_prover(c: &mut Criterion) {
    let mut prng = test_rng();

    // a chain of squarings behind one committed pair
    let mut cs = SparseCS::<BLSScalar>::new();
    let x = cs.new_public_input();
    let y = cs.new_secret_input();
    let _ = cs.commit(&[x, y]).unwrap();
    let mut acc = x;
    for _ in 0..1000 {
        acc = cs.square(acc);
        acc = cs.add(acc, y);
    }
    cs.pad();

    let pcs = KZGCommitmentSchemeBLS::new(cs.size + 2, &mut prng);
    let prover_params = indexer(&cs, &pcs).unwrap();
    let witness = Witness::new(vec![BLSScalar::from(2u32)], vec![BLSScalar::from(3u32)]);

    let mut prover_group = c.benchmark_group("prover");
    prover_group.sample_size(10);
    prover_group.bench_function(format!("{} constraints", cs.size), |b| {
        b.iter(|| {
            let mut transcript = Transcript::new(b"BenchPlonk");
            prover(
                &mut prng,
                &mut transcript,
                &pcs,
                &cs,
                &prover_params,
                &witness,
            )
            .unwrap()
        });
    });
    prover_group.finish();

    let mut transcript = Transcript::new(b"BenchPlonk");
    let proof = prover(
        &mut prng,
        &mut transcript,
        &pcs,
        &cs,
        &prover_params,
        &witness,
    )
    .unwrap();
    let verifier_pcs = pcs.shrink_to_verifier_only();
    let verifier_params = prover_params.get_verifier_params_ref();

    let mut verifier_group = c.benchmark_group("verifier");
    verifier_group.bench_function(format!("{} constraints", cs.size), |b| {
        b.iter(|| {
            let mut transcript = Transcript::new(b"BenchPlonk");
            verifier(
                &mut transcript,
                &verifier_pcs,
                verifier_params,
                &witness.public,
                &proof,
            )
            .unwrap()
        });
    });
    verifier_group.finish();
}

criterion_group!(benches, bench_prover);
criterion_main!(benches);
