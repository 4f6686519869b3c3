/*
 * Copyright © 2025, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! one-shot notifications that fire a configured lead time before a satellite overpass.
//!
//! The current time is always passed in by the caller so that scheduling decisions are deterministic. Timers
//! are tokio tasks, hence scheduling of pending notifications has to happen from within a tokio runtime.
//! A notification is either fired immediately (if the overpass is already within the lead time window) or goes
//! through `Pending -> Fired|Cancelled`. Transitions out of `Pending` happen under a lock so that a cancelled
//! notification can never fire afterwards.

use std::{sync::{Arc, Mutex, MutexGuard}, time::Duration};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{task::AbortHandle, time::sleep};
use tracing::{debug, info};

use crate::{SceneRecord, errors::Result};

pub const MILLIS_PER_MINUTE: i64 = 60_000;

/// what gets notified - this is our abstraction for toasts, slack messages, console output etc.
pub trait OverpassSink: Send + Sync + 'static {
    fn notify (&self, msg: &str);
}

impl<F> OverpassSink for F where F: Fn(&str) + Send + Sync + 'static {
    fn notify (&self, msg: &str) { self(msg) }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum NotificationState {
    Pending,
    Fired,
    Cancelled
}

/// when and what to notify
#[derive(Debug,Clone,PartialEq,Eq,Serialize,Deserialize)]
pub struct NotificationSchedule {
    pub fire_at_epoch_millis: i64,
    pub payload: String,
}

impl NotificationSchedule {
    pub fn new (acquisition: DateTime<Utc>, lead_time_minutes: i64, payload: impl Into<String>)->Self {
        let fire_at_epoch_millis = fire_at_millis( acquisition, lead_time_minutes);
        NotificationSchedule { fire_at_epoch_millis, payload: payload.into() }
    }

    pub fn fire_at (&self)->Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis( self.fire_at_epoch_millis)
    }

    /// time left until the notification is due, None if it is already due
    pub fn delay_from (&self, now: DateTime<Utc>)->Option<Duration> {
        let dt = self.fire_at_epoch_millis.saturating_sub( now.timestamp_millis());
        if dt > 0 { Some( Duration::from_millis( dt as u64)) } else { None }
    }
}

fn fire_at_millis (acquisition: DateTime<Utc>, lead_time_minutes: i64)->i64 {
    acquisition.timestamp_millis().saturating_sub( lead_time_minutes.saturating_mul( MILLIS_PER_MINUTE))
}

/// fractional minutes from `now` until the overpass (negative if it already happened)
pub fn minutes_until_pass (acquisition: DateTime<Utc>, now: DateTime<Utc>)->f64 {
    (acquisition - now).num_milliseconds() as f64 / MILLIS_PER_MINUTE as f64
}

/// handle for a scheduled notification. Dropping the handle does not cancel a pending notification
#[derive(Debug)]
pub struct CancelHandle {
    state: Arc<Mutex<NotificationState>>,
    task: Option<AbortHandle>
}

impl CancelHandle {
    fn fired ()->Self {
        CancelHandle { state: Arc::new( Mutex::new( NotificationState::Fired)), task: None }
    }

    pub fn state (&self)->NotificationState {
        *lock_state( &self.state)
    }

    pub fn is_pending (&self)->bool {
        self.state() == NotificationState::Pending
    }

    /// cancel if still pending. Returns true if the notification was cancelled by this call
    pub fn cancel (&self)->bool {
        let mut state = lock_state( &self.state);
        if *state == NotificationState::Pending {
            *state = NotificationState::Cancelled;
            if let Some(task) = &self.task { task.abort() }
            true
        } else {
            false
        }
    }
}

// a poisoned lock only means a sink panicked - the state itself is still consistent
fn lock_state (state: &Mutex<NotificationState>)->MutexGuard<'_,NotificationState> {
    state.lock().unwrap_or_else( |e| e.into_inner())
}

/// the basic scheduling function: notify `sink` now if the schedule is already due, otherwise start a timer
pub fn schedule (sched: NotificationSchedule, now: DateTime<Utc>, sink: Arc<dyn OverpassSink>)->CancelHandle {
    match sched.delay_from( now) {
        Some(delay) => {
            info!("overpass notification scheduled in {:.1} min", delay.as_secs_f64() / 60.0);
            let state = Arc::new( Mutex::new( NotificationState::Pending));
            let task_state = state.clone();
            let payload = sched.payload;

            let jh = tokio::spawn( async move {
                sleep( delay).await;
                let mut state = lock_state( &task_state);
                if *state == NotificationState::Pending {
                    *state = NotificationState::Fired;
                    sink.notify( &payload);
                }
            });

            CancelHandle { state, task: Some( jh.abort_handle()) }
        }
        None => {
            info!("overpass notification is due");
            sink.notify( &sched.payload);
            CancelHandle::fired()
        }
    }
}

/// schedule `payload` to be notified `lead_time_minutes` before `acquisition`
pub fn schedule_notification<S> (acquisition: DateTime<Utc>, lead_time_minutes: i64, now: DateTime<Utc>, payload: impl Into<String>, sink: S)->CancelHandle
    where S: OverpassSink
{
    schedule( NotificationSchedule::new( acquisition, lead_time_minutes, payload), now, Arc::new( sink))
}

pub fn pending_message (scene: &SceneRecord, lead_time_minutes: i64)->String {
    format!("Landsat will pass over in {} minutes! (Path: {}, Row: {})", lead_time_minutes, scene.wrs_path, scene.wrs_row)
}

pub fn immediate_message ()->String {
    "Landsat is passing over right now!".to_string()
}

/// a notification subscription that keeps at most one notification pending. Each update replaces (cancels)
/// the previous notification, dropping the notifier cancels a pending notification
pub struct OverpassNotifier {
    sink: Arc<dyn OverpassSink>,
    current: Option<CancelHandle>
}

impl OverpassNotifier {
    pub fn new (sink: impl OverpassSink)->Self {
        OverpassNotifier { sink: Arc::new( sink), current: None }
    }

    /// None if nothing was scheduled yet
    pub fn state (&self)->Option<NotificationState> {
        self.current.as_ref().map( |h| h.state())
    }

    pub fn update (&mut self, acquisition: DateTime<Utc>, lead_time_minutes: i64, now: DateTime<Utc>, payload: impl Into<String>)->NotificationState {
        self.cancel();
        let handle = schedule( NotificationSchedule::new( acquisition, lead_time_minutes, payload), now, self.sink.clone());
        let state = handle.state();
        self.current = Some( handle);
        state
    }

    /// schedule for the acquisition start of `scene`. Any pending notification of a previous scene is cancelled
    /// first, also if the acquisition time of `scene` can't be parsed (which is reported as error)
    pub fn update_for_scene (&mut self, scene: &SceneRecord, lead_time_minutes: i64, now: DateTime<Utc>)->Result<NotificationState> {
        self.cancel();
        let acquisition = scene.acquisition_start()?;
        let payload = if fire_at_millis( acquisition, lead_time_minutes) > now.timestamp_millis() {
            pending_message( scene, lead_time_minutes)
        } else {
            immediate_message()
        };
        debug!("overpass of {}/{} in {:.1} min", scene.wrs_path, scene.wrs_row, minutes_until_pass( acquisition, now));

        Ok( self.update( acquisition, lead_time_minutes, now, payload) )
    }

    pub fn cancel (&mut self)->bool {
        if let Some(handle) = self.current.take() {
            let cancelled = handle.cancel();
            if cancelled { debug!("pending overpass notification cancelled") }
            cancelled
        } else {
            false
        }
    }
}

impl Drop for OverpassNotifier {
    fn drop (&mut self) {
        self.cancel();
    }
}
