//! Synthetic visitor simulation.
//!
//! A recurring spawner tick creates one [`VisitorBot`] per interval. Each bot
//! drives an ordinary [`ChatSession`] with no real transport: it joins under
//! a random name, posts messages drawn from a weighted pool after randomized
//! bounded pauses, and leaves once a biased coin says stop. Because the stop
//! probability is strictly positive, every bot terminates almost surely.
//!
//! Bots never read input; their only side effect is channel bus publishes.

use std::sync::Arc;
use std::time::Duration;

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use agora_types::config::VisitorConfig;
use agora_types::error::ChatError;

use crate::bus::ChannelBus;
use crate::registry::ConnectionRegistry;
use crate::session::ChatSession;

/// Display names sampled (with replacement) for visitor bots.
const NAMES: &[&str] = &[
    "Finley", "Kadence", "Paityn", "Zander", "Theresa", "Lilyana", "Lewis", "Waylon", "Samuel",
    "Haiden", "Saniya", "Kyson", "Corinne", "Neil", "Maia", "Gia", "Lyla", "Kendrick", "Aditya",
    "Seamus", "Roselyn", "Ashleigh", "Hailey", "Edgar", "Caio", "Luis", "Gustavo", "Emil", "Jean",
    "Joey", "Anais", "Margaret",
];

/// The bot message pool with explicit selection weights.
///
/// Common greetings and farewells carry weight 2 so they surface about twice
/// as often as the rest.
const MESSAGE_POOL: &[(&str, u32)] = &[
    ("Hi!", 2),
    ("hi :-)", 2),
    ("yo!", 2),
    ("Yo", 2),
    ("hello world!", 2),
    ("hi world", 2),
    ("hi ya'll", 1),
    ("I think I saw someone with my handle! Not fair!", 1),
    ("Anybody there?", 1),
    ("test", 1),
    ("cool", 1),
    ("nice", 1),
    ("works", 1),
    ("lol", 1),
    ("I love Rust", 1),
    ("Help! I think I'm a bot...!", 1),
    ("bye", 2),
    ("Bye", 2),
];

/// Weighted message pool with auditable per-entry weights.
pub struct WeightedPool {
    entries: Vec<(String, u32)>,
    dist: WeightedIndex<u32>,
}

impl WeightedPool {
    /// Build a pool from `(text, weight)` entries.
    ///
    /// Returns `None` when the entries are empty or all weights are zero.
    pub fn new(entries: Vec<(String, u32)>) -> Option<Self> {
        let dist = WeightedIndex::new(entries.iter().map(|(_, w)| *w)).ok()?;
        Some(Self { entries, dist })
    }

    /// The built-in demo message pool.
    pub fn standard() -> Self {
        Self::new(
            MESSAGE_POOL
                .iter()
                .map(|(text, weight)| (text.to_string(), *weight))
                .collect(),
        )
        .expect("built-in message pool has positive weights")
    }

    /// Draw one message according to the weights.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> &str {
        &self.entries[self.dist.sample(rng)].0
    }

    pub fn entries(&self) -> &[(String, u32)] {
        &self.entries
    }
}

/// One synthetic chat participant.
///
/// The bot owns its session (and the session's subscription, so the bot
/// counts as a real chat subscriber) plus the RNG that drives its pacing.
pub struct VisitorBot<R: Rng> {
    session: ChatSession,
    /// Held so the bot stays in the channel's subscriber set; never read.
    _subscription: crate::bus::Subscription,
    pool: Arc<WeightedPool>,
    config: VisitorConfig,
    rng: R,
}

impl<R: Rng> VisitorBot<R> {
    /// Join the chat under a randomly chosen name.
    pub fn join(
        bus: Arc<ChannelBus>,
        registry: Arc<ConnectionRegistry>,
        pool: Arc<WeightedPool>,
        config: VisitorConfig,
        mut rng: R,
    ) -> Result<Self, ChatError> {
        let name = NAMES.choose(&mut rng).copied().unwrap_or("Visitor");
        let mut session = ChatSession::new(bus, registry);
        let welcome = session.open(Some(name))?;
        Ok(Self {
            session,
            _subscription: welcome.subscription,
            pool,
            config,
            rng,
        })
    }

    /// Post one message and flip the stop coin.
    ///
    /// Returns `true` when the bot should post again.
    pub fn step(&mut self) -> Result<bool, ChatError> {
        let message = self.pool.sample(&mut self.rng).to_string();
        self.session.post(&message)?;
        Ok(!self.rng.random_bool(self.config.stop_probability.clamp(0.0, 1.0)))
    }

    /// Draw the randomized pause before the next post.
    pub fn next_pause(&mut self) -> Duration {
        let min = self.config.pause_min_ms.min(self.config.pause_max_ms);
        let max = self.config.pause_min_ms.max(self.config.pause_max_ms);
        Duration::from_millis(self.rng.random_range(min..=max))
    }

    /// Leave the chat (publishes the leave line).
    ///
    /// The unread subscription is dropped with the bot.
    pub fn leave(mut self) {
        self.session.close();
    }

    /// Drive the bot to completion: pause, post, maybe repeat, then leave.
    pub async fn run(mut self) {
        loop {
            let pause = self.next_pause();
            tokio::time::sleep(pause).await;
            match self.step() {
                Ok(true) => continue,
                Ok(false) => break,
                Err(err) => {
                    tracing::warn!(%err, "visitor bot post failed");
                    break;
                }
            }
        }
        self.leave();
    }
}

/// Spawns one visitor bot per tick until cancelled.
pub struct VisitorSimulator {
    bus: Arc<ChannelBus>,
    registry: Arc<ConnectionRegistry>,
    config: VisitorConfig,
    pool: Arc<WeightedPool>,
}

impl VisitorSimulator {
    pub fn new(
        bus: Arc<ChannelBus>,
        registry: Arc<ConnectionRegistry>,
        config: VisitorConfig,
    ) -> Self {
        Self {
            bus,
            registry,
            config,
            pool: Arc::new(WeightedPool::standard()),
        }
    }

    /// Start the recurring spawner task.
    ///
    /// The first bot spawns immediately; one more follows every
    /// `spawn_interval_secs`. Cancel the returned token to stop spawning
    /// (bots already running finish their sequences on their own).
    pub fn spawn(self) -> CancellationToken {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        tokio::spawn(async move {
            let period = Duration::from_secs(self.config.spawn_interval_secs.max(1));
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => self.spawn_bot(),
                }
            }
            tracing::debug!("visitor spawner stopped");
        });

        cancel
    }

    fn spawn_bot(&self) {
        let bot = VisitorBot::join(
            self.bus.clone(),
            self.registry.clone(),
            self.pool.clone(),
            self.config.clone(),
            StdRng::from_os_rng(),
        );
        match bot {
            Ok(bot) => {
                tokio::spawn(bot.run());
            }
            Err(err) => tracing::warn!(%err, "failed to spawn visitor bot"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::Subscription;
    use crate::session::CHAT_CHANNEL;
    use agora_types::participant::ConnectionId;

    fn fixtures() -> (Arc<ChannelBus>, Arc<ConnectionRegistry>) {
        (
            Arc::new(ChannelBus::new()),
            Arc::new(ConnectionRegistry::new()),
        )
    }

    fn drain(sub: &mut Subscription) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(line) = sub.try_recv() {
            lines.push(line.to_string());
        }
        lines
    }

    fn test_config() -> VisitorConfig {
        VisitorConfig {
            enabled: true,
            spawn_interval_secs: 1,
            pause_min_ms: 1,
            pause_max_ms: 2,
            stop_probability: 3.0 / 7.0,
        }
    }

    #[test]
    fn weighted_pool_respects_weights() {
        let pool = WeightedPool::new(vec![("hey".to_string(), 2), ("rare".to_string(), 1)]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let mut hey = 0usize;
        let mut rare = 0usize;
        for _ in 0..3000 {
            match pool.sample(&mut rng) {
                "hey" => hey += 1,
                _ => rare += 1,
            }
        }
        // Expectation is 2000 / 1000; allow generous slack.
        assert!(hey > rare + 300, "hey={hey} rare={rare}");
    }

    #[test]
    fn weighted_pool_rejects_empty_and_zero_weights() {
        assert!(WeightedPool::new(Vec::new()).is_none());
        assert!(WeightedPool::new(vec![("x".to_string(), 0)]).is_none());
    }

    #[test]
    fn standard_pool_doubles_common_phrases() {
        let pool = WeightedPool::standard();
        let greeting = pool.entries().iter().find(|(t, _)| t == "Hi!").unwrap();
        let plain = pool.entries().iter().find(|(t, _)| t == "test").unwrap();
        assert_eq!(greeting.1, 2 * plain.1);
    }

    #[test]
    fn bot_joins_posts_and_leaves_with_one_join_and_one_leave() {
        let (bus, registry) = fixtures();
        let mut watcher = bus.subscribe(ConnectionId::new(), CHAT_CHANNEL);

        let mut bot = VisitorBot::join(
            bus.clone(),
            registry.clone(),
            Arc::new(WeightedPool::standard()),
            test_config(),
            StdRng::seed_from_u64(42),
        )
        .unwrap();

        // The continuation probability is strictly below 1, so a seeded bot
        // stops within a bounded number of steps.
        let mut steps = 0usize;
        while bot.step().unwrap() {
            steps += 1;
            assert!(steps < 10_000, "bot never decided to stop");
        }
        bot.leave();

        let lines = drain(&mut watcher);
        let joins = lines.iter().filter(|l| l.ends_with("joined the chat.")).count();
        let leaves = lines.iter().filter(|l| l.ends_with("left the chat.")).count();
        assert_eq!(joins, 1);
        assert_eq!(leaves, 1);
        // One broadcast per post, plus the join and leave lines.
        assert_eq!(lines.len(), steps + 3);
        assert_eq!(registry.online_count(), 0);
    }

    #[test]
    fn bot_pauses_stay_within_bounds() {
        let (bus, registry) = fixtures();
        let config = VisitorConfig {
            pause_min_ms: 100,
            pause_max_ms: 200,
            ..test_config()
        };
        let mut bot = VisitorBot::join(
            bus,
            registry,
            Arc::new(WeightedPool::standard()),
            config,
            StdRng::seed_from_u64(1),
        )
        .unwrap();

        for _ in 0..100 {
            let pause = bot.next_pause();
            assert!(pause >= Duration::from_millis(100));
            assert!(pause <= Duration::from_millis(200));
        }
    }

    #[tokio::test]
    async fn simulator_spawns_a_bot_that_joins() {
        let (bus, registry) = fixtures();
        let mut watcher = bus.subscribe(ConnectionId::new(), CHAT_CHANNEL);

        let simulator = VisitorSimulator::new(bus, registry, test_config());
        let token = simulator.spawn();

        let joined = tokio::time::timeout(Duration::from_secs(5), watcher.recv())
            .await
            .expect("no bot joined within the timeout")
            .unwrap();
        assert!(joined.ends_with("joined the chat."));

        token.cancel();
    }
}
