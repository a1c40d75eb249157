use serde::{Deserialize, Serialize};

use super::WeightedSampler;
use crate::graph_util::CostMatrix;

const N_ANTS: usize = 2;
const N_BEST: usize = 2;
const N_ITERATIONS: usize = 10;
const DECAY: f64 = 0.95;
const ALPHA: f64 = 1.0;
const BETA: f64 = 1.0;

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
#[serde(default)]
pub struct ACOArgs {
    /// Ants released per iteration.
    pub n_ants: usize,
    /// Ants per iteration that deposit pheromone.
    pub n_best: usize,
    pub n_iterations: usize,
    /// Every pheromone entry is multiplied by this after each iteration.
    pub decay: f64,
    /// Weight of the pheromone trail.
    pub alpha: f64,
    /// Weight of the inverse distance.
    pub beta: f64,
}

impl Default for ACOArgs {
    fn default() -> Self {
        ACOArgs {
            n_ants: N_ANTS,
            n_best: N_BEST,
            n_iterations: N_ITERATIONS,
            decay: DECAY,
            alpha: ALPHA,
            beta: BETA,
        }
    }
}

type Move = (usize, usize);

#[derive(Clone, Debug)]
struct AntRoute {
    moves: Vec<Move>,
    dist: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ACOResult {
    /// Matrix slots from source to destination.
    pub route: Vec<usize>,
    pub dist: f64,
    /// All-time best distance after each iteration, infinite until some ant
    /// arrives.
    pub best_history: Vec<f64>,
}

/// One colony per path request; the pheromone never outlives it.
pub struct AntColony<'a> {
    distances: &'a CostMatrix,
    pheromone: Vec<Vec<f64>>,
    args: ACOArgs,
}

impl<'a> AntColony<'a> {
    pub fn new(distances: &'a CostMatrix, args: ACOArgs) -> Self {
        let n = distances.len();
        let init = if n > 0 { 1.0 / n as f64 } else { 0.0 };
        AntColony {
            distances,
            pheromone: vec![vec![init; n]; n],
            args,
        }
    }
    pub fn get_pheromone(&self) -> &Vec<Vec<f64>> {
        &self.pheromone
    }
    /// Returns `None` if no ant reached `dst` in any iteration.
    pub fn run(
        &mut self,
        src: usize,
        dst: usize,
        sampler: &mut dyn WeightedSampler,
    ) -> Option<ACOResult> {
        if src == dst {
            return Some(ACOResult {
                route: vec![src],
                dist: 0.0,
                best_history: vec![],
            });
        }
        let mut all_time_best: Option<AntRoute> = None;
        let mut best_history = Vec::with_capacity(self.args.n_iterations);
        for _ in 0..self.args.n_iterations {
            let mut all_routes = self.gen_all_routes(src, dst, sampler);
            all_routes.sort_by(|a, b| a.dist.total_cmp(&b.dist));
            self.spread_pheromone(&all_routes);
            if let Some(local_best) = all_routes.first() {
                let improved = match &all_time_best {
                    Some(best) => local_best.dist < best.dist,
                    None => true,
                };
                if improved {
                    all_time_best = Some(local_best.clone());
                }
            }
            best_history.push(
                all_time_best
                    .as_ref()
                    .map_or(std::f64::INFINITY, |best| best.dist),
            );
            self.evaporate();
        }
        all_time_best.map(|best| ACOResult {
            route: moves_to_route(&best.moves),
            dist: best.dist,
            best_history,
        })
    }
    fn gen_all_routes(
        &self,
        src: usize,
        dst: usize,
        sampler: &mut dyn WeightedSampler,
    ) -> Vec<AntRoute> {
        (0..self.args.n_ants)
            .filter_map(|_| self.gen_route(src, dst, &mut *sampler))
            .map(|moves| {
                let dist = moves.iter().map(|&(i, j)| self.distances.get(i, j)).sum();
                AntRoute { moves, dist }
            })
            .collect()
    }
    /// A single ant walks at most `n - 1` steps; dead ends and exhausted
    /// walks are dropped.
    fn gen_route(
        &self,
        src: usize,
        dst: usize,
        sampler: &mut dyn WeightedSampler,
    ) -> Option<Vec<Move>> {
        let n = self.distances.len();
        let mut moves = vec![];
        let mut visited = vec![false; n];
        visited[src] = true;
        let mut prev = src;
        for _ in 0..n.saturating_sub(1) {
            let next = self.pick_move(prev, &visited, sampler)?;
            moves.push((prev, next));
            if next == dst {
                return Some(moves);
            }
            visited[next] = true;
            prev = next;
        }
        None
    }
    /// Transition weights are `pheromone^alpha * (1/distance)^beta`, taken in
    /// log space and scaled so the most attractive candidate weighs 1.0.
    /// Blocked candidates weigh 0.0.
    fn move_weights(&self, cur: usize, visited: &[bool]) -> Vec<f64> {
        let log_weights: Vec<Option<f64>> = (0..self.distances.len())
            .map(|j| {
                if visited[j] || !self.distances.is_edge(cur, j) {
                    return None;
                }
                let ph = self.pheromone[cur][j].clamp(f64::MIN_POSITIVE, f64::MAX);
                let dist = self.distances.get(cur, j).clamp(f64::MIN_POSITIVE, f64::MAX);
                Some(self.args.alpha * ph.ln() - self.args.beta * dist.ln())
            })
            .collect();
        let max = log_weights
            .iter()
            .flatten()
            .fold(f64::NEG_INFINITY, |acc, &w| acc.max(w));
        log_weights
            .into_iter()
            .map(|w| w.map_or(0.0, |w| (w - max).exp()))
            .collect()
    }
    fn pick_move(
        &self,
        cur: usize,
        visited: &[bool],
        sampler: &mut dyn WeightedSampler,
    ) -> Option<usize> {
        sampler.sample(&self.move_weights(cur, visited))
    }
    /// `sorted_routes` must be ordered by ascending distance.
    fn spread_pheromone(&mut self, sorted_routes: &[AntRoute]) {
        for route in sorted_routes.iter().take(self.args.n_best) {
            for &(i, j) in route.moves.iter() {
                self.pheromone[i][j] += 1.0 / self.distances.get(i, j);
            }
        }
    }
    fn evaporate(&mut self) {
        let decay = self.args.decay;
        for row in self.pheromone.iter_mut() {
            for ph in row.iter_mut() {
                *ph *= decay;
            }
        }
    }
}

/// `[(a, b), (b, c), (c, d)]` becomes `[a, b, c, d]`.
fn moves_to_route(moves: &[Move]) -> Vec<usize> {
    let mut route = Vec::with_capacity(moves.len() + 1);
    if let Some(&(first, second)) = moves.first() {
        route.push(first);
        route.push(second);
    }
    for &(_, next) in moves.iter().skip(1) {
        route.push(next);
    }
    route
}
