use campus_epi::individual::DiseaseRng;
use campus_epi::{IndividualParameters, Parameters, RngStore, Simulator, Status};

/// A ring of ten with no outside infection and no testing.
fn ring(transmission_probability: f64, individual: IndividualParameters) -> Parameters {
    Parameters {
        rewiring_probability: 0.0,
        neighbors: 2,
        background_infection_probability: 0.0,
        transmission_probability,
        incubation_length: 3,
        contact_test_probability: 0.0,
        surveillance_test_probability: 0.0,
        population_size: 10,
        seed: 42,
        individual,
    }
}

fn mild_only() -> IndividualParameters {
    IndividualParameters {
        symptom_probabilities: vec![0.0, 1.0, 0.0],
        cure_dates: vec![10, 10, 21],
    }
}

fn outbreak() -> Parameters {
    Parameters {
        background_infection_probability: 0.01,
        population_size: 300,
        seed: 17,
        ..Parameters::default()
    }
}

fn check_individuals(simulator: &Simulator) {
    let profile = simulator.disease_profile();
    let longest_course = profile.cure_dates().into_iter().max().unwrap();
    for individual in simulator.individuals() {
        let status = individual.status();
        let days = individual.days_since_infection();
        if status == Status::Susceptible {
            assert_eq!(days, 0, "{individual}");
            assert!(!individual.tested_positive(), "{individual}");
        }
        if days > 0 {
            assert!(status.is_infected(), "{individual}");
        }
        if status == Status::Incubating {
            assert!(days < profile.incubation_length(), "{individual}");
        }
        if status.symptom_index().is_some() {
            assert!(days >= profile.incubation_length(), "{individual}");
        }
        assert!(days < longest_course, "{individual}");
    }
}

#[test]
fn certain_transmission_sweeps_ring_in_one_day() {
    let mut simulator = Simulator::new(ring(1.0, IndividualParameters::default())).unwrap();
    simulator.force_infect(9).unwrap();

    let record = simulator.simulate_one_day().clone();
    assert_eq!(record.new_infections, 9);
    assert_eq!(record.tests_administered, 0);
    assert!(simulator
        .individuals()
        .iter()
        .all(|individual| individual.status() == Status::Incubating));
    assert_eq!(simulator.individual(9).unwrap().days_since_infection(), 1);
    assert_eq!(simulator.individual(0).unwrap().days_since_infection(), 0);
}

#[test]
fn ring_neighbors_infected_on_day_one() {
    let mut simulator = Simulator::new(ring(1.0, IndividualParameters::default())).unwrap();
    simulator.force_infect(5).unwrap();

    simulator.simulate_one_day();
    let infected: Vec<usize> = simulator
        .individuals()
        .iter()
        .filter(|individual| individual.status().is_infected())
        .map(|individual| individual.id())
        .collect();
    // 4 is reached before 5 is scanned, then the infection runs ahead of the scan to 9.
    assert_eq!(infected, vec![4, 5, 6, 7, 8, 9]);

    let mut previous = infected.len();
    for _ in 0..8 {
        simulator.simulate_one_day();
        let count = simulator.individuals().len() - simulator.status_counts()[0];
        assert!(count >= previous);
        previous = count;
    }
    assert_eq!(previous, 10);
    assert_eq!(simulator.cumulative_infections(), 9);
}

#[test]
fn no_exposure_no_infections() {
    let parameters = Parameters {
        background_infection_probability: 0.0,
        transmission_probability: 0.0,
        population_size: 200,
        ..Parameters::default()
    };
    let mut simulator = Simulator::new(parameters).unwrap();
    let log = simulator.run(40).clone();

    assert_eq!(log.len(), 40);
    assert_eq!(log.total_infections(), 0);
    assert!(simulator.cumulative_tests() > 0);
    for record in &log {
        assert_eq!(record.positive_tests, 0);
        assert_eq!(record.positive_rate, 0.0);
    }
    assert_eq!(simulator.status_counts(), [200, 0, 0, 0, 0]);
}

#[test]
fn nothing_happens_without_exposure_or_testing() {
    let mut simulator = Simulator::new(ring(0.0, IndividualParameters::default())).unwrap();
    for record in simulator.run(25) {
        assert_eq!(record.new_infections, 0);
        assert_eq!(record.tests_administered, 0);
    }
    assert_eq!(simulator.status_counts(), [10, 0, 0, 0, 0]);
}

#[test]
fn symptomatic_individual_self_tests_and_recovers() {
    let mut simulator = Simulator::new(ring(0.0, mild_only())).unwrap();
    simulator.force_infect(0).unwrap();

    simulator.run(2);
    let individual = simulator.individual(0).unwrap();
    assert_eq!(individual.status(), Status::Incubating);
    assert!(!individual.tested_positive());

    simulator.simulate_one_day();
    let individual = simulator.individual(0).unwrap();
    assert_eq!(individual.status(), Status::Mild);
    assert!(individual.tested_positive());
    assert_eq!(simulator.log().last().unwrap().tests_administered, 0);

    simulator.run(7);
    let individual = simulator.individual(0).unwrap();
    assert_eq!(simulator.current_day(), 10);
    assert_eq!(individual.status(), Status::Susceptible);
    assert!(!individual.tested_positive());
    assert_eq!(individual.days_since_infection(), 0);
}

#[test]
fn isolated_individual_infects_nobody() {
    let parameters = Parameters {
        incubation_length: 1,
        ..ring(1.0, mild_only())
    };
    let mut simulator = Simulator::new(parameters).unwrap();
    simulator.force_infect(0).unwrap();

    simulator.simulate_one_day();
    assert!(simulator.individual(0).unwrap().tested_positive());

    simulator.run(19);
    assert_eq!(simulator.cumulative_infections(), 0);
    assert!(simulator
        .individuals()
        .iter()
        .all(|individual| individual.is_susceptible()));
}

#[test]
fn contacts_of_a_positive_are_tested() {
    let parameters = Parameters {
        incubation_length: 1,
        contact_test_probability: 1.0,
        ..ring(0.0, mild_only())
    };
    let mut simulator = Simulator::new(parameters).unwrap();
    simulator.force_infect(4).unwrap();

    // 4 self-tests on day 1 after 3 has been scanned, so only 5 is contact tested.
    let record = simulator.simulate_one_day().clone();
    assert_eq!(record.tests_administered, 1);
    assert_eq!(record.positive_tests, 0);

    let record = simulator.simulate_one_day().clone();
    assert_eq!(record.tests_administered, 2);
    assert_eq!(record.positive_rate, 0.0);
}

#[test]
fn state_stays_consistent_through_an_outbreak() {
    let mut simulator = Simulator::new(outbreak()).unwrap();
    let mut cumulative_infections = 0;
    let mut cumulative_tests = 0;
    for day in 1..=80 {
        let record = simulator.simulate_one_day().clone();
        assert_eq!(record.day, day);
        assert!(record.positive_tests <= record.tests_administered);
        assert!((0.0..=1.0).contains(&record.positive_rate));
        cumulative_infections += record.new_infections;
        cumulative_tests += record.tests_administered;
        assert_eq!(record.cumulative_infections, cumulative_infections);
        assert_eq!(record.cumulative_tests, cumulative_tests);
        check_individuals(&simulator);
    }
    assert!(simulator.cumulative_infections() > 0);
    assert_eq!(
        simulator.status_counts().iter().sum::<usize>(),
        simulator.individuals().len()
    );
}

#[test]
fn same_seed_same_run() {
    let mut first = Simulator::new(outbreak()).unwrap();
    let mut second = Simulator::new(outbreak()).unwrap();
    first.run(50);
    second.run(50);
    assert_eq!(first.log(), second.log());
    assert_eq!(first.status_snapshot(), second.status_snapshot());
    assert_eq!(first.graph(), second.graph());
}

fn infected_log(parameters: Parameters, days: u32) -> campus_epi::SimulationLog {
    let mut simulator = Simulator::new(parameters).unwrap();
    simulator.force_infect(0).unwrap();
    simulator.run(days).clone()
}

#[test]
fn zero_probabilities_still_consume_draws() {
    let base = Parameters {
        background_infection_probability: 0.0,
        population_size: 100,
        ..outbreak()
    };
    let tiny_background = Parameters {
        background_infection_probability: 1e-300,
        ..base.clone()
    };
    assert_eq!(infected_log(base.clone(), 30), infected_log(tiny_background, 30));

    let no_transmission = Parameters {
        transmission_probability: 0.0,
        background_infection_probability: 0.01,
        ..base.clone()
    };
    let tiny_transmission = Parameters {
        transmission_probability: 1e-300,
        ..no_transmission.clone()
    };
    let log = infected_log(no_transmission, 30);
    assert!(log.total_infections() > 0);
    assert_eq!(log, infected_log(tiny_transmission, 30));
}

#[test]
fn disease_draws_follow_scan_order() {
    const P: f64 = 0.3;
    const I: f64 = 0.6;
    const T: f64 = 0.5;
    const S: f64 = 0.4;
    let parameters = Parameters {
        rewiring_probability: 0.0,
        neighbors: 2,
        population_size: 6,
        background_infection_probability: P,
        transmission_probability: I,
        contact_test_probability: T,
        surveillance_test_probability: S,
        incubation_length: 3,
        seed: 11,
        ..Parameters::default()
    };
    let mut simulator = Simulator::new(parameters).unwrap();
    simulator.force_infect(0).unwrap();

    // Replays the scan with its own generator. Nobody reaches the end of incubation within two
    // days, so the day scan makes every disease draw.
    let rngs = RngStore::new(11);
    let mut infected = [true, false, false, false, false, false];
    let mut tested = [false; 6];
    for _ in 0..2 {
        let (mut new_infections, mut tests, mut positives) = (0, 0, 0);
        for id in 0..6 {
            if tested[id] {
                continue;
            }
            if rngs.sample_uniform(DiseaseRng) < P && !infected[id] {
                infected[id] = true;
                new_infections += 1;
            }
            let mut flagged = false;
            for &neighbor in simulator.graph().neighbors(id) {
                if infected[neighbor]
                    && !tested[neighbor]
                    && rngs.sample_uniform(DiseaseRng) < I
                    && !infected[id]
                {
                    infected[id] = true;
                    new_infections += 1;
                }
                flagged |= tested[neighbor];
            }
            let p = if flagged { T } else { S };
            if rngs.sample_uniform(DiseaseRng) < p {
                tests += 1;
                if infected[id] {
                    tested[id] = true;
                    positives += 1;
                }
            }
        }

        let record = simulator.simulate_one_day().clone();
        assert_eq!(record.new_infections, new_infections);
        assert_eq!(record.tests_administered, tests);
        assert_eq!(record.positive_tests, positives);
        for (id, individual) in simulator.individuals().iter().enumerate() {
            assert_eq!(individual.status().is_infected(), infected[id], "{individual}");
            assert_eq!(individual.tested_positive(), tested[id], "{individual}");
        }
    }
}

#[test]
fn reset_replays_a_run() {
    let mut simulator = Simulator::new(outbreak()).unwrap();
    let log = simulator.run(30).clone();
    let snapshot = simulator.status_snapshot();

    simulator.reset(17, IndividualParameters::default()).unwrap();
    assert_eq!(simulator.current_day(), 0);
    assert!(simulator.log().is_empty());
    assert_eq!(simulator.run(30), &log);
    assert_eq!(simulator.status_snapshot(), snapshot);
}

#[test]
fn different_seeds_differ() {
    let mut first = Simulator::new(outbreak()).unwrap();
    let mut second = Simulator::new(Parameters {
        seed: 18,
        ..outbreak()
    })
    .unwrap();
    first.run(50);
    second.run(50);
    assert_ne!(first.log(), second.log());
}

#[test]
fn population_sits_on_a_small_world_graph() {
    let simulator = Simulator::new(outbreak()).unwrap();
    let graph = simulator.graph();
    assert_eq!(graph.node_count(), 300);
    assert_eq!(graph.edge_count(), 300 * 4 / 2);
    for individual in simulator.individuals() {
        assert_eq!(individual.neighbor_ids(), graph.neighbors(individual.id()));
    }
}
