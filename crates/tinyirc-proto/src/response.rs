//! Numeric replies.
//!
//! Only the numerics the server actually emits are listed.

#![allow(non_camel_case_types)]

use std::fmt;

/// A three digit server reply code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Response {
    /// 001
    RPL_WELCOME = 1,
    /// 002
    RPL_YOURHOST = 2,
    /// 003
    RPL_CREATED = 3,
    /// 004
    RPL_MYINFO = 4,
    /// 221 - current user modes
    RPL_UMODEIS = 221,
    /// 311 - WHOIS user line
    RPL_WHOISUSER = 311,
    /// 312 - WHOIS server line
    RPL_WHOISSERVER = 312,
    /// 318
    RPL_ENDOFWHOIS = 318,
    /// 319 - WHOIS channel list
    RPL_WHOISCHANNELS = 319,
    /// 321
    RPL_LISTSTART = 321,
    /// 322 - one LIST entry
    RPL_LIST = 322,
    /// 323
    RPL_LISTEND = 323,
    /// 324 - channel modes
    RPL_CHANNELMODEIS = 324,
    /// 331
    RPL_NOTOPIC = 331,
    /// 332
    RPL_TOPIC = 332,
    /// 333 - who set the topic and when
    RPL_TOPICWHOTIME = 333,
    /// 351
    RPL_VERSION = 351,
    /// 353 - NAMES entry
    RPL_NAMREPLY = 353,
    /// 366
    RPL_ENDOFNAMES = 366,
    /// 391
    RPL_TIME = 391,
    /// 401
    ERR_NOSUCHNICK = 401,
    /// 403
    ERR_NOSUCHCHANNEL = 403,
    /// 404
    ERR_CANNOTSENDTOCHAN = 404,
    /// 409
    ERR_NOORIGIN = 409,
    /// 411
    ERR_NORECIPIENT = 411,
    /// 412
    ERR_NOTEXTTOSEND = 412,
    /// 417
    ERR_INPUTTOOLONG = 417,
    /// 421
    ERR_UNKNOWNCOMMAND = 421,
    /// 431
    ERR_NONICKNAMEGIVEN = 431,
    /// 432
    ERR_ERRONEUSNICKNAME = 432,
    /// 433
    ERR_NICKNAMEINUSE = 433,
    /// 441
    ERR_USERNOTINCHANNEL = 441,
    /// 442
    ERR_NOTONCHANNEL = 442,
    /// 451
    ERR_NOTREGISTERED = 451,
    /// 461
    ERR_NEEDMOREPARAMS = 461,
    /// 462
    ERR_ALREADYREGISTRED = 462,
    /// 472
    ERR_UNKNOWNMODE = 472,
    /// 482
    ERR_CHANOPRIVSNEEDED = 482,
    /// 501
    ERR_UMODEUNKNOWNFLAG = 501,
    /// 502
    ERR_USERSDONTMATCH = 502,
}

impl Response {
    /// Numeric value of the reply.
    pub fn code(self) -> u16 {
        self as u16
    }

    /// True for 400-599.
    pub fn is_error(self) -> bool {
        (400..600).contains(&self.code())
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.code())
    }
}
