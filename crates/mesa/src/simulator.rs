//! Program simulator for driving components without a host event loop.
//!
//! The simulator owns a model, a queue of pending messages and a queue of
//! pending commands. Commands run one at a time, in the order they were
//! produced, and every message they yield is fed back into the model.

use std::collections::VecDeque;

use crate::Model;
use crate::command::Cmd;
use crate::message::{BatchMsg, Message};

/// Statistics tracked during simulation.
#[derive(Debug, Clone, Default)]
pub struct SimulationStats {
    /// Number of times init() was called.
    pub init_calls: usize,
    /// Number of times update() was called.
    pub update_calls: usize,
    /// Number of times view() was called.
    pub view_calls: usize,
    /// Commands that were returned from init/update or dispatched.
    pub commands_returned: usize,
    /// Commands that were executed.
    pub commands_executed: usize,
}

/// A simulator for driving [`Model`] implementations.
///
/// # Example
///
/// ```rust
/// use mesa::{Cmd, Message, Model, simulator::ProgramSimulator};
///
/// struct Counter { count: i32 }
///
/// impl Model for Counter {
///     fn init(&mut self) -> Option<Cmd> { None }
///     fn update(&mut self, msg: Message) -> Option<Cmd> {
///         if let Some(n) = msg.downcast::<i32>() {
///             self.count += n;
///         }
///         None
///     }
///     fn view(&self) -> String {
///         format!("Count: {}", self.count)
///     }
/// }
///
/// let mut sim = ProgramSimulator::new(Counter { count: 0 });
/// sim.send(Message::new(5));
/// sim.send(Message::new(3));
/// sim.step();
/// sim.step();
///
/// assert_eq!(sim.model().count, 8);
/// ```
pub struct ProgramSimulator<M: Model> {
    model: M,
    input_queue: VecDeque<Message>,
    pending_cmds: VecDeque<Cmd>,
    output_views: Vec<String>,
    stats: SimulationStats,
    initialized: bool,
}

impl<M: Model> ProgramSimulator<M> {
    /// Create a new simulator with the given model.
    pub fn new(model: M) -> Self {
        Self {
            model,
            input_queue: VecDeque::new(),
            pending_cmds: VecDeque::new(),
            output_views: Vec::new(),
            stats: SimulationStats::default(),
            initialized: false,
        }
    }

    /// Initialize the model, queueing the command returned by init().
    pub fn init(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        self.stats.init_calls += 1;

        let cmd = self.model.init();
        self.dispatch(cmd);

        self.stats.view_calls += 1;
        self.output_views.push(self.model.view());
    }

    /// Queue a message for processing.
    pub fn send(&mut self, msg: Message) {
        self.input_queue.push_back(msg);
    }

    /// Queue a command, typically one returned by a direct method call on
    /// the model.
    pub fn dispatch(&mut self, cmd: Option<Cmd>) {
        if let Some(cmd) = cmd {
            self.stats.commands_returned += 1;
            self.pending_cmds.push_back(cmd);
        }
    }

    /// Process one message from the queue, calling update and view.
    ///
    /// Returns the command returned by update, if any. The command is not
    /// queued, so tests can control when (and in which order) it runs.
    pub fn step(&mut self) -> Option<Cmd> {
        if !self.initialized {
            self.init();
        }

        let msg = self.input_queue.pop_front()?;
        self.process(msg)
    }

    fn process(&mut self, msg: Message) -> Option<Cmd> {
        self.stats.update_calls += 1;
        let cmd = self.model.update(msg);

        self.stats.view_calls += 1;
        self.output_views.push(self.model.view());

        cmd
    }

    /// Process messages and execute commands until both queues are empty.
    ///
    /// Returns the number of messages processed.
    pub async fn run_until_idle(&mut self) -> usize {
        if !self.initialized {
            self.init();
        }

        let mut processed = 0;
        loop {
            if let Some(msg) = self.input_queue.pop_front() {
                let cmd = self.process(msg);
                self.dispatch(cmd);
                processed += 1;
                continue;
            }

            let Some(cmd) = self.pending_cmds.pop_front() else {
                break;
            };
            self.stats.commands_executed += 1;
            let Some(msg) = cmd.execute().await else {
                continue;
            };
            if msg.is::<BatchMsg>() {
                if let Some(BatchMsg(cmds)) = msg.downcast::<BatchMsg>() {
                    self.pending_cmds.extend(cmds);
                }
            } else {
                self.input_queue.push_back(msg);
            }
        }
        processed
    }

    /// Get a reference to the current model state.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Get a mutable reference to the current model state.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Consume the simulator and return the final model.
    pub fn into_model(self) -> M {
        self.model
    }

    /// Get the simulation statistics.
    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    /// Get all captured view outputs.
    pub fn views(&self) -> &[String] {
        &self.output_views
    }

    /// Get the most recent view output.
    pub fn last_view(&self) -> Option<&str> {
        self.output_views.last().map(String::as_str)
    }

    /// Whether messages or commands are still waiting.
    pub fn is_idle(&self) -> bool {
        self.input_queue.is_empty() && self.pending_cmds.is_empty()
    }
}
